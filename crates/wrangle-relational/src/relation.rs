//! Immutable relation handles.

use std::fmt;

use polars::prelude::{DataFrame, Expr, IntoLazy, LazyFrame, PolarsResult};
use tracing::trace;
use wrangle_model::Row;

use crate::expression::{Expression, column_ref};
use crate::frame::rows_from_frame;

/// A named columnar projection in a lazy plan.
///
/// Every transformation returns a new `Relation`; the receiver is never
/// changed. Cloning is cheap, the plan is only executed by
/// [`Relation::collect`].
#[derive(Clone)]
pub struct Relation {
    name: String,
    plan: LazyFrame,
    columns: Vec<String>,
}

impl Relation {
    /// Wrap an in-memory frame.
    pub fn from_frame(name: impl Into<String>, df: DataFrame) -> Self {
        let columns = df
            .get_column_names()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        Self {
            name: name.into(),
            plan: df.lazy(),
            columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in projection order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Bind `name` to `expression`.
    ///
    /// An existing column keeps its position; a new one is appended.
    #[must_use]
    pub fn set_column(&self, name: &str, expression: &Expression) -> Self {
        trace!(relation = %self.name, column = name, source = expression.source(), "bind column");
        let mut columns = self.columns.clone();
        if !self.has_column(name) {
            columns.push(name.to_string());
        }
        Self {
            name: self.name.clone(),
            plan: self
                .plan
                .clone()
                .with_column(expression.expr().clone().alias(name)),
            columns,
        }
    }

    /// Project away `name`. Unknown names leave the projection unchanged.
    #[must_use]
    pub fn drop_column(&self, name: &str) -> Self {
        let columns: Vec<String> = self
            .columns
            .iter()
            .filter(|column| column.as_str() != name)
            .cloned()
            .collect();
        let projection: Vec<Expr> = columns.iter().map(|column| column_ref(column)).collect();
        Self {
            name: self.name.clone(),
            plan: self.plan.clone().select(projection),
            columns,
        }
    }

    /// Execute the plan.
    ///
    /// # Errors
    ///
    /// Returns the engine error if the plan references unknown columns or
    /// fails to evaluate.
    pub fn collect(&self) -> PolarsResult<DataFrame> {
        self.plan.clone().collect()
    }

    /// Execute the plan and return its rows.
    ///
    /// # Errors
    ///
    /// Same as [`Relation::collect`].
    pub fn materialize(&self) -> PolarsResult<Vec<Row>> {
        rows_from_frame(&self.collect()?)
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{ColumnExpressionFactory, ExpressionFactory};
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use wrangle_model::Value;

    fn column_names(df: &DataFrame) -> Vec<&str> {
        df.get_column_names().into_iter().map(|n| n.as_str()).collect()
    }

    fn relation() -> Relation {
        let df = DataFrame::new(vec![
            Series::new("id".into(), vec![1_i64]).into_column(),
            Series::new("a".into(), vec!["x"]).into_column(),
        ])
        .unwrap();
        Relation::from_frame("input", df)
    }

    #[test]
    fn set_column_returns_new_handle() {
        let base = relation();
        let factory = ColumnExpressionFactory;
        let next = base.set_column("copy", &factory.compile("a").unwrap());

        assert_eq!(base.columns(), ["id", "a"]);
        assert_eq!(next.columns(), ["id", "a", "copy"]);
        let rows = next.materialize().unwrap();
        assert_eq!(rows[0].get("copy"), Some(&Value::from("x")));
        assert_eq!(base.collect().unwrap().width(), 2);
    }

    #[test]
    fn rebinding_keeps_position() {
        let factory = ColumnExpressionFactory;
        let next = relation().set_column("a", &factory.compile("'z'").unwrap());

        assert_eq!(next.columns(), ["id", "a"]);
        let df = next.collect().unwrap();
        assert_eq!(column_names(&df), ["id", "a"]);
        assert_eq!(rows_from_frame(&df).unwrap()[0].get("a"), Some(&Value::from("z")));
    }

    #[test]
    fn drop_column_projects_remaining() {
        let next = relation().drop_column("id");
        assert_eq!(next.columns(), ["a"]);
        assert_eq!(column_names(&next.collect().unwrap()), ["a"]);
    }

    #[test]
    fn drop_column_keeps_selector_like_names() {
        let df = DataFrame::new(vec![
            Series::new("*".into(), vec!["star"]).into_column(),
            Series::new("^a$".into(), vec!["regex"]).into_column(),
            Series::new("a".into(), vec!["plain"]).into_column(),
        ])
        .unwrap();

        let next = Relation::from_frame("input", df).drop_column("a");

        let collected = next.collect().unwrap();
        assert_eq!(column_names(&collected), ["*", "^a$"]);
        let rows = rows_from_frame(&collected).unwrap();
        assert_eq!(rows[0].get("^a$"), Some(&Value::from("regex")));
    }
}
