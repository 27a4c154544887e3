//! Directives that operate on column names.

mod swap;

pub use swap::{SWAP_TEMP_COLUMN, Swap};
