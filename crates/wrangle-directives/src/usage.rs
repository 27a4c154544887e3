//! Directive usage definitions.
//!
//! A [`UsageDefinition`] lists the parameters a directive accepts, in order,
//! with the [`TokenType`] each one requires. It is declared once per directive
//! type and drives both argument binding and the usage string shown to users.

use std::fmt;

use wrangle_model::TokenType;

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub kind: TokenType,
    pub optional: bool,
}

impl Parameter {
    fn usage(&self) -> String {
        let term = match self.kind {
            TokenType::ColumnName => format!(":{}", self.name),
            TokenType::Text => format!("'{}'", self.name),
            TokenType::Expression => format!("exp:{{{}}}", self.name),
            TokenType::Numeric | TokenType::Bool | TokenType::Identifier => self.name.clone(),
        };
        if self.optional {
            format!("[{term}]")
        } else {
            term
        }
    }
}

/// Ordered parameter list of a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageDefinition {
    directive: String,
    parameters: Vec<Parameter>,
}

impl UsageDefinition {
    /// Start a definition for the directive `name`.
    pub fn builder(name: impl Into<String>) -> UsageBuilder {
        UsageBuilder {
            directive: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Usage string, e.g. `swap :left :right`.
    pub fn usage(&self) -> String {
        let mut out = self.directive.clone();
        for parameter in &self.parameters {
            out.push(' ');
            out.push_str(&parameter.usage());
        }
        out
    }
}

impl fmt::Display for UsageDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.usage())
    }
}

/// Builder for [`UsageDefinition`].
#[derive(Debug)]
pub struct UsageBuilder {
    directive: String,
    parameters: Vec<Parameter>,
}

impl UsageBuilder {
    /// Declare a required parameter.
    #[must_use]
    pub fn define(mut self, name: impl Into<String>, kind: TokenType) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            kind,
            optional: false,
        });
        self
    }

    /// Declare an optional parameter. Optional parameters go last.
    #[must_use]
    pub fn define_optional(mut self, name: impl Into<String>, kind: TokenType) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            kind,
            optional: true,
        });
        self
    }

    pub fn build(self) -> UsageDefinition {
        UsageDefinition {
            directive: self.directive,
            parameters: self.parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_usage_per_kind() {
        let usage = UsageDefinition::builder("fill")
            .define("column", TokenType::ColumnName)
            .define("value", TokenType::Text)
            .define_optional("condition", TokenType::Expression)
            .build();
        assert_eq!(usage.usage(), "fill :column 'value' [exp:{condition}]");
        assert_eq!(usage.parameters().len(), 3);
        assert!(usage.parameters()[2].optional);
    }
}
