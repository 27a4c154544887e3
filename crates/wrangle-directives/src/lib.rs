//! Wrangling directives.
//!
//! A directive is one parameterized step of a wrangling recipe. Each directive
//! declares its parameters ([`UsageDefinition`]), runs row-wise
//! ([`Directive::execute`]) and may also compile itself into a relation
//! ([`RelationCompilable`]) and report lineage ([`LineageReportable`]).
//!
//! # Example
//!
//! ```
//! use wrangle_directives::default_registry;
//! use wrangle_model::{Row, Value};
//!
//! let step = default_registry().compose("swap :a :b").unwrap();
//! let rows = step
//!     .execute(vec![Row::new().with("a", "x").with("b", "y")])
//!     .unwrap();
//! assert_eq!(rows[0].get("a"), Some(&Value::from("y")));
//! ```

mod arguments;
mod directive;
mod registry;
mod step;
mod tokenizer;
mod usage;

pub mod column;

pub use arguments::Arguments;
pub use directive::{
    Capabilities, Directive, DirectivePlugin, LineageReportable, RelationCompilable,
};
pub use registry::{DirectiveRegistry, Registration, default_registry};
pub use step::Step;
pub use tokenizer::{ParsedStep, parse_step};
pub use usage::{Parameter, UsageBuilder, UsageDefinition};
