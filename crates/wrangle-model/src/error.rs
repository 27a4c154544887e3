use thiserror::Error;

use crate::token::TokenType;

/// Argument binding failures, raised while a step is being composed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{directive}: missing required argument '{parameter}'")]
    MissingArgument {
        directive: String,
        parameter: String,
    },
    #[error("{directive}: argument '{parameter}' expects {expected}, found {found} '{token}'")]
    WrongKind {
        directive: String,
        parameter: String,
        expected: TokenType,
        found: TokenType,
        token: String,
    },
    #[error("{directive}: unexpected argument '{token}'")]
    UnexpectedArgument { directive: String, token: String },
    #[error("{directive}: malformed token '{token}': {reason}")]
    MalformedToken {
        directive: String,
        token: String,
        reason: String,
    },
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),
    #[error("empty recipe step")]
    EmptyStep,
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Row-wise execution failures. Fatal for the batch, not the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("{directive}: column '{column}' does not exist")]
    ColumnNotFound { directive: String, column: String },
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Directive used out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("{directive}: used before initialize")]
    NotInitialized { directive: String },
    #[error("{directive}: initialize called twice")]
    AlreadyInitialized { directive: String },
    #[error("{directive}: used after destroy")]
    Destroyed { directive: String },
}

/// Serialized row that cannot form a [`Row`](crate::Row).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowShapeError {
    #[error("row has {columns} column names but {values} values")]
    LengthMismatch { columns: usize, values: usize },
    #[error("column '{0}' appears more than once in a row")]
    DuplicateColumn(String),
}

impl ExecutionError {
    /// The missing column, for [`ExecutionError::ColumnNotFound`].
    pub fn missing_column(&self) -> Option<&str> {
        match self {
            Self::ColumnNotFound { column, .. } => Some(column),
            Self::Lifecycle(_) => None,
        }
    }
}
