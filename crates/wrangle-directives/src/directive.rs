//! Directive traits and capabilities.
//!
//! Every directive runs row-wise. Relational compilation and lineage are
//! optional capabilities a directive opts into by returning itself from
//! [`Directive::as_relational`] / [`Directive::as_lineage`]; the set is
//! recorded once, when a [`Step`](crate::Step) is initialized.
//!
//! # Implementing a directive
//!
//! ```ignore
//! struct Upper { column: String }
//!
//! impl DirectivePlugin for Upper {
//!     const NAME: &'static str = "uppercase";
//!     const DESCRIPTION: &'static str = "Upper-cases a column.";
//!     const CATEGORY: &'static str = "transform";
//!
//!     fn define() -> UsageDefinition {
//!         UsageDefinition::builder(Self::NAME)
//!             .define("column", TokenType::ColumnName)
//!             .build()
//!     }
//!
//!     fn initialize(args: &Arguments) -> Result<Self, ParseError> {
//!         Ok(Self { column: args.column_name("column")?.to_string() })
//!     }
//! }
//! ```

use std::fmt;

use wrangle_model::{ExecutionError, Mutation, ParseError, Row};
use wrangle_relational::{Relation, RelationError, RelationalContext};

use crate::arguments::Arguments;
use crate::usage::UsageDefinition;

/// A bound, executable directive instance.
///
/// Instances are read-only once bound, so one instance may execute many
/// batches concurrently.
pub trait Directive: Send + Sync {
    /// Registered directive name.
    fn name(&self) -> &'static str;

    /// Apply the directive to a batch, returning the resulting batch.
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be processed; the batch is abandoned.
    fn execute(&self, rows: Vec<Row>) -> Result<Vec<Row>, ExecutionError>;

    /// Relational compilation capability.
    fn as_relational(&self) -> Option<&dyn RelationCompilable> {
        None
    }

    /// Lineage reporting capability.
    fn as_lineage(&self) -> Option<&dyn LineageReportable> {
        None
    }

    /// Release external handles. Called at most once.
    fn destroy(&mut self) {}

    /// Capabilities this instance exposes.
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            row: true,
            relational: self.as_relational().is_some(),
            lineage: self.as_lineage().is_some(),
        }
    }
}

/// Directives that can fold themselves into a relation.
pub trait RelationCompilable {
    /// Return a new relation with this directive's effect applied.
    ///
    /// # Errors
    ///
    /// [`RelationError::NoExpressionFactory`] when `context` cannot compile
    /// expressions; callers then execute row-wise.
    fn transform(
        &self,
        context: &RelationalContext,
        relation: &Relation,
    ) -> Result<Relation, RelationError>;
}

/// Directives that report field-level lineage.
pub trait LineageReportable {
    /// Lineage of this instance. Depends only on bound arguments.
    fn lineage(&self) -> Mutation;
}

/// Directive types that can be registered and constructed from arguments.
pub trait DirectivePlugin: Directive + Sized + 'static {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    const CATEGORY: &'static str;

    /// Parameters accepted by this directive.
    fn define() -> UsageDefinition;

    /// Build an instance from bound arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when an argument is missing or of the wrong kind.
    fn initialize(args: &Arguments) -> Result<Self, ParseError>;
}

/// Which execution modes a directive supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub row: bool,
    pub relational: bool,
    pub lineage: bool,
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (self.row, "row"),
            (self.relational, "relational"),
            (self.lineage, "lineage"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect();
        f.write_str(&names.join(","))
    }
}
