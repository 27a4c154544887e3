//! Runner components for wrangling recipes.

pub mod logging;
pub mod pipeline;
