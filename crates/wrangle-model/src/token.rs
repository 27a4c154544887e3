//! Typed argument tokens.
//!
//! Every directive parameter is declared with a [`TokenType`]; the recipe
//! tokenizer produces [`Token`]s and binding checks the two agree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of token a directive parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Column reference written as `:name`.
    ColumnName,
    /// Quoted text literal.
    Text,
    /// Integer or decimal literal.
    Numeric,
    /// `true` or `false`.
    Bool,
    /// Expression block written as `exp:{...}`.
    Expression,
    /// Any other bare word.
    Identifier,
}

impl TokenType {
    /// Human-readable name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColumnName => "column name",
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Bool => "boolean",
            Self::Expression => "expression",
            Self::Identifier => "identifier",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed argument value. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    ColumnName(String),
    Text(String),
    Numeric(f64),
    Bool(bool),
    Expression(String),
    Identifier(String),
}

impl Token {
    /// The kind of this token.
    pub fn token_type(&self) -> TokenType {
        match self {
            Self::ColumnName(_) => TokenType::ColumnName,
            Self::Text(_) => TokenType::Text,
            Self::Numeric(_) => TokenType::Numeric,
            Self::Bool(_) => TokenType::Bool,
            Self::Expression(_) => TokenType::Expression,
            Self::Identifier(_) => TokenType::Identifier,
        }
    }

    /// Column name payload.
    pub fn as_column_name(&self) -> Option<&str> {
        match self {
            Self::ColumnName(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnName(name) => write!(f, ":{name}"),
            Self::Text(text) => write!(f, "'{text}'"),
            Self::Numeric(value) => write!(f, "{}", crate::value::format_numeric(*value)),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Expression(body) => write!(f, "exp:{{{body}}}"),
            Self::Identifier(word) => f.write_str(word),
        }
    }
}
