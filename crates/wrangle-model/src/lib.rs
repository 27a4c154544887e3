//! Data model shared by wrangling directives.
//!
//! - **row**: ordered records of named cells
//! - **value**: typed cell values
//! - **token**: typed directive arguments
//! - **lineage**: field-level provenance records
//! - **error**: parse, execution and lifecycle errors

pub mod error;
pub mod lineage;
pub mod row;
pub mod token;
pub mod value;

pub use error::{ExecutionError, LifecycleError, ParseError, RowShapeError};
pub use lineage::{FieldRelation, Mutation, MutationBuilder};
pub use row::Row;
pub use token::{Token, TokenType};
pub use value::Value;
