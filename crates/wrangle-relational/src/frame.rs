//! Conversion between polars frames and row batches.

use polars::prelude::{AnyValue, DataFrame, PolarsResult};
use wrangle_model::{Row, Value};

/// Converts a polars `AnyValue` into a row [`Value`].
///
/// Temporal and nested types fall back to their display text.
pub fn any_to_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::Int8(v) => Value::Int(i64::from(v)),
        AnyValue::Int16(v) => Value::Int(i64::from(v)),
        AnyValue::Int32(v) => Value::Int(i64::from(v)),
        AnyValue::Int64(v) => Value::Int(v),
        AnyValue::UInt8(v) => Value::Int(i64::from(v)),
        AnyValue::UInt16(v) => Value::Int(i64::from(v)),
        AnyValue::UInt32(v) => Value::Int(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).map_or(Value::Float(v as f64), Value::Int),
        AnyValue::Float32(v) => Value::Float(f64::from(v)),
        AnyValue::Float64(v) => Value::Float(v),
        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        other => {
            let s = other.to_string();
            // Display wraps some types in quotes
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                Value::Text(s[1..s.len() - 1].to_string())
            } else {
                Value::Text(s)
            }
        }
    }
}

/// Materialize every row of `df`, keeping column order.
///
/// # Errors
///
/// Returns an error if a cell cannot be read from its column.
pub fn rows_from_frame(df: &DataFrame) -> PolarsResult<Vec<Row>> {
    let columns = df.get_columns();
    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut row = Row::new();
        for column in columns {
            row.add(column.name().as_str(), any_to_value(column.get(idx)?));
        }
        rows.push(row);
    }
    Ok(rows)
}
