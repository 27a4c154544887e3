//! Ordered record of named cells.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::RowShapeError;
use crate::value::Value;

/// One record: an ordered sequence of `(name, value)` cells.
///
/// Lookup by name returns the first matching position. Positions are stable
/// while a directive works on the row; renaming a column never moves it.
///
/// Deserialization rejects rows whose names and values differ in length or
/// that repeat a column name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "SerializedRow")]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell to the end of the row.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.columns.push(name.into());
        self.values.push(value.into());
    }

    /// Builder-style [`Row::add`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add(name, value);
        self
    }

    /// Position of the first cell named `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Value of the first cell named `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.find(name).and_then(|idx| self.values.get(idx))
    }

    /// Value at `index`.
    pub fn get_value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Column name at `index`.
    pub fn column(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    /// Rename the cell at `index`, returning the previous name.
    ///
    /// Returns `None` and leaves the row untouched when `index` is out of range.
    pub fn set_column(&mut self, index: usize, name: impl Into<String>) -> Option<String> {
        let slot = self.columns.get_mut(index)?;
        Some(std::mem::replace(slot, name.into()))
    }

    /// Replace the value at `index`, returning the previous value.
    pub fn set_value(&mut self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let slot = self.values.get_mut(index)?;
        Some(std::mem::replace(slot, value.into()))
    }

    /// Number of cells.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in positional order.
    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(String::as_str)
    }

    /// Cells in positional order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

#[derive(Deserialize)]
struct SerializedRow {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl TryFrom<SerializedRow> for Row {
    type Error = RowShapeError;

    fn try_from(serialized: SerializedRow) -> Result<Self, Self::Error> {
        let SerializedRow { columns, values } = serialized;
        if columns.len() != values.len() {
            return Err(RowShapeError::LengthMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }
        let mut seen = HashSet::with_capacity(columns.len());
        if let Some(duplicate) = columns.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(RowShapeError::DuplicateColumn(duplicate.clone()));
        }
        Ok(Self { columns, values })
    }
}

impl<N, V> FromIterator<(N, V)> for Row
where
    N: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.add(name, value);
        }
        row
    }
}
