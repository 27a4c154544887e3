//! Relational pushdown support for wrangling directives.
//!
//! Directives that can express themselves as column bindings compile into a
//! [`Relation`] instead of running row by row. The relation wraps a polars
//! lazy plan; expressions come from an [`ExpressionFactory`] resolved from the
//! [`RelationalContext`]. When the context has no factory, directives report
//! [`RelationError::NoExpressionFactory`] and callers run them row-wise.

mod context;
mod error;
mod expression;
mod frame;
mod relation;

pub use context::RelationalContext;
pub use error::{ExpressionError, RelationError};
pub use expression::{
    ColumnExpressionFactory, Expression, ExpressionFactory, column_ref, quote_identifier,
};
pub use frame::{any_to_value, rows_from_frame};
pub use relation::Relation;
