use thiserror::Error;
use wrangle_model::LifecycleError;

/// Failures compiling a textual expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("empty expression")]
    Empty,
    #[error("unterminated quote in '{0}'")]
    UnterminatedQuote(String),
    #[error("unsupported expression '{0}'")]
    Unsupported(String),
}

/// Failures folding a directive into a relation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationError {
    /// The active engine offers no expression factory. Callers fall back to
    /// row-wise execution.
    #[error("{directive}: cannot find an expression factory")]
    NoExpressionFactory { directive: String },
    #[error("{directive}: relational compilation is not supported")]
    Unsupported { directive: String },
    #[error("{directive}: column '{column}' does not exist in relation '{relation}'")]
    ColumnNotFound {
        directive: String,
        column: String,
        relation: String,
    },
    #[error("{directive}: temporary column '{column}' already exists in relation '{relation}'")]
    TemporaryColumnCollision {
        directive: String,
        column: String,
        relation: String,
    },
    #[error("{directive}: {source}")]
    Expression {
        directive: String,
        source: ExpressionError,
    },
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl RelationError {
    /// True when the caller should retry the step row-wise instead of failing.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            Self::NoExpressionFactory { .. } | Self::Unsupported { .. }
        )
    }
}
