//! Binding of argument tokens against a usage definition.

use wrangle_model::{ParseError, Token, TokenType};

use crate::usage::UsageDefinition;

/// Argument values bound to declared parameter names.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    directive: String,
    values: Vec<(String, Token)>,
}

impl Arguments {
    /// Bind `tokens` positionally to the parameters of `usage`.
    ///
    /// # Errors
    ///
    /// Fails when a required parameter has no token, a token has the wrong
    /// kind, or tokens are left over.
    pub fn bind(usage: &UsageDefinition, tokens: Vec<Token>) -> Result<Self, ParseError> {
        let directive = usage.directive().to_string();
        let mut tokens = tokens.into_iter();
        let mut values = Vec::with_capacity(usage.parameters().len());

        for parameter in usage.parameters() {
            let Some(token) = tokens.next() else {
                if parameter.optional {
                    break;
                }
                return Err(ParseError::MissingArgument {
                    directive,
                    parameter: parameter.name.clone(),
                });
            };
            if token.token_type() != parameter.kind {
                return Err(ParseError::WrongKind {
                    directive,
                    parameter: parameter.name.clone(),
                    expected: parameter.kind,
                    found: token.token_type(),
                    token: token.to_string(),
                });
            }
            values.push((parameter.name.clone(), token));
        }

        if let Some(extra) = tokens.next() {
            return Err(ParseError::UnexpectedArgument {
                directive,
                token: extra.to_string(),
            });
        }

        Ok(Self { directive, values })
    }

    /// Name of the directive these arguments were bound for.
    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Token bound to `name`.
    pub fn value(&self, name: &str) -> Option<&Token> {
        self.values
            .iter()
            .find(|(parameter, _)| parameter == name)
            .map(|(_, token)| token)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column name bound to `name`.
    ///
    /// # Errors
    ///
    /// Fails when `name` is unbound or bound to another kind of token.
    pub fn column_name(&self, name: &str) -> Result<&str, ParseError> {
        match self.value(name) {
            Some(Token::ColumnName(column)) => Ok(column),
            Some(other) => Err(ParseError::WrongKind {
                directive: self.directive.clone(),
                parameter: name.to_string(),
                expected: TokenType::ColumnName,
                found: other.token_type(),
                token: other.to_string(),
            }),
            None => Err(ParseError::MissingArgument {
                directive: self.directive.clone(),
                parameter: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage() -> UsageDefinition {
        UsageDefinition::builder("demo")
            .define("source", TokenType::ColumnName)
            .define_optional("label", TokenType::Text)
            .build()
    }

    #[test]
    fn binds_required_and_optional() {
        let args = Arguments::bind(
            &usage(),
            vec![Token::ColumnName("a".into()), Token::Text("x".into())],
        )
        .unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args.column_name("source"), Ok("a"));
        assert_eq!(args.value("label"), Some(&Token::Text("x".into())));
    }

    #[test]
    fn optional_may_be_omitted() {
        let args = Arguments::bind(&usage(), vec![Token::ColumnName("a".into())]).unwrap();
        assert!(!args.contains("label"));
    }

    #[test]
    fn missing_required_is_reported() {
        let error = Arguments::bind(&usage(), Vec::new()).unwrap_err();
        assert_eq!(
            error,
            ParseError::MissingArgument {
                directive: "demo".into(),
                parameter: "source".into(),
            }
        );
    }

    #[test]
    fn wrong_kind_is_reported() {
        let error = Arguments::bind(&usage(), vec![Token::Numeric(1.0)]).unwrap_err();
        assert_eq!(
            error,
            ParseError::WrongKind {
                directive: "demo".into(),
                parameter: "source".into(),
                expected: TokenType::ColumnName,
                found: TokenType::Numeric,
                token: "1".into(),
            }
        );
    }

    #[test]
    fn extra_tokens_are_rejected() {
        let error = Arguments::bind(
            &usage(),
            vec![
                Token::ColumnName("a".into()),
                Token::Text("x".into()),
                Token::Bool(true),
            ],
        )
        .unwrap_err();
        assert_eq!(
            error,
            ParseError::UnexpectedArgument {
                directive: "demo".into(),
                token: "true".into(),
            }
        );
    }

    #[test]
    fn column_name_checks_kind() {
        let args = Arguments::bind(
            &usage(),
            vec![Token::ColumnName("a".into()), Token::Text("x".into())],
        )
        .unwrap();
        assert!(matches!(
            args.column_name("label"),
            Err(ParseError::WrongKind { .. })
        ));
        assert!(matches!(
            args.column_name("nope"),
            Err(ParseError::MissingArgument { .. })
        ));
    }
}
