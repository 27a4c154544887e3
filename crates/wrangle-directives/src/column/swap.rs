//! `swap :left :right` exchanges the names of two columns.
//!
//! Values never move: the cell named `left` is relabelled `right` and the
//! other way round, so each row keeps its width and positional order.

use tracing::debug;
use wrangle_model::{ExecutionError, Mutation, ParseError, Row, TokenType};
use wrangle_relational::{Relation, RelationError, RelationalContext};

use crate::arguments::Arguments;
use crate::directive::{Directive, DirectivePlugin, LineageReportable, RelationCompilable};
use crate::usage::UsageDefinition;

/// Column the relational form stages the right operand in.
pub const SWAP_TEMP_COLUMN: &str = "tempColumn";

/// Swaps the names of two columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swap {
    left: String,
    right: String,
}

impl Swap {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    /// Swap names in place, row by row.
    ///
    /// Stops at the first row missing either column. Rows before it stay
    /// swapped; that row and the rest are untouched.
    ///
    /// # Errors
    ///
    /// [`ExecutionError::ColumnNotFound`] naming the missing column, `left`
    /// checked first.
    pub fn apply(&self, rows: &mut [Row]) -> Result<(), ExecutionError> {
        for row in rows.iter_mut() {
            self.swap_row(row)?;
        }
        Ok(())
    }

    fn swap_row(&self, row: &mut Row) -> Result<(), ExecutionError> {
        let left_idx = row
            .find(&self.left)
            .ok_or_else(|| self.column_not_found(&self.left))?;
        let right_idx = row
            .find(&self.right)
            .ok_or_else(|| self.column_not_found(&self.right))?;

        row.set_column(left_idx, self.right.as_str());
        row.set_column(right_idx, self.left.as_str());
        Ok(())
    }

    fn column_not_found(&self, column: &str) -> ExecutionError {
        ExecutionError::ColumnNotFound {
            directive: Self::NAME.to_string(),
            column: column.to_string(),
        }
    }

    fn relation_error(&self, column: &str, relation: &Relation) -> RelationError {
        RelationError::ColumnNotFound {
            directive: Self::NAME.to_string(),
            column: column.to_string(),
            relation: relation.name().to_string(),
        }
    }
}

impl DirectivePlugin for Swap {
    const NAME: &'static str = "swap";
    const DESCRIPTION: &'static str = "Swaps the column names of two columns.";
    const CATEGORY: &'static str = "column";

    fn define() -> UsageDefinition {
        UsageDefinition::builder(Self::NAME)
            .define("left", TokenType::ColumnName)
            .define("right", TokenType::ColumnName)
            .build()
    }

    fn initialize(args: &Arguments) -> Result<Self, ParseError> {
        Ok(Self::new(args.column_name("left")?, args.column_name("right")?))
    }
}

impl Directive for Swap {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn execute(&self, mut rows: Vec<Row>) -> Result<Vec<Row>, ExecutionError> {
        debug!(left = %self.left, right = %self.right, rows = rows.len(), "swap columns");
        self.apply(&mut rows)?;
        Ok(rows)
    }

    fn as_relational(&self) -> Option<&dyn RelationCompilable> {
        Some(self)
    }

    fn as_lineage(&self) -> Option<&dyn LineageReportable> {
        Some(self)
    }
}

impl RelationCompilable for Swap {
    fn transform(
        &self,
        context: &RelationalContext,
        relation: &Relation,
    ) -> Result<Relation, RelationError> {
        let Some(factory) = context.expression_factory() else {
            return Err(RelationError::NoExpressionFactory {
                directive: Self::NAME.to_string(),
            });
        };

        for column in [&self.left, &self.right] {
            if !relation.has_column(column) {
                return Err(self.relation_error(column, relation));
            }
        }
        if relation.has_column(SWAP_TEMP_COLUMN) {
            return Err(RelationError::TemporaryColumnCollision {
                directive: Self::NAME.to_string(),
                column: SWAP_TEMP_COLUMN.to_string(),
                relation: relation.name().to_string(),
            });
        }

        let compile = |column: &str| {
            factory
                .column(column)
                .map_err(|source| RelationError::Expression {
                    directive: Self::NAME.to_string(),
                    source,
                })
        };

        let staged = relation.set_column(SWAP_TEMP_COLUMN, &compile(&self.right)?);
        let staged = staged.set_column(&self.right, &compile(&self.left)?);
        let staged = staged.set_column(&self.left, &compile(SWAP_TEMP_COLUMN)?);
        Ok(staged.drop_column(SWAP_TEMP_COLUMN))
    }
}

impl LineageReportable for Swap {
    fn lineage(&self) -> Mutation {
        Mutation::builder()
            .readable(format!(
                "Swapped columns '{}' and '{}'",
                self.left, self.right
            ))
            .relation([self.left.as_str()], [self.right.as_str()])
            .relation([self.right.as_str()], [self.left.as_str()])
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
    use wrangle_model::{Token, Value};
    use wrangle_relational::{ColumnExpressionFactory, ExpressionFactory};

    fn row(a: &str, b: &str) -> Row {
        Row::new().with("id", 1_i64).with("a", a).with("b", b)
    }

    fn relation() -> Relation {
        let df = DataFrame::new(vec![
            Series::new("id".into(), vec![1_i64]).into_column(),
            Series::new("a".into(), vec!["x"]).into_column(),
            Series::new("b".into(), vec!["y"]).into_column(),
        ])
        .unwrap();
        Relation::from_frame("input", df)
    }

    fn pushdown() -> RelationalContext {
        RelationalContext::new().with_expression_factory(Arc::new(ColumnExpressionFactory))
    }

    #[test]
    fn initialize_binds_both_columns() {
        let args = Arguments::bind(
            &Swap::define(),
            vec![Token::ColumnName("a".into()), Token::ColumnName("b".into())],
        )
        .unwrap();
        assert_eq!(Swap::initialize(&args).unwrap(), Swap::new("a", "b"));
    }

    #[test]
    fn renames_without_moving_values() {
        let rows = Swap::new("a", "b").execute(vec![row("x", "y")]).unwrap();

        assert_eq!(rows[0].columns().collect::<Vec<_>>(), ["id", "b", "a"]);
        assert_eq!(rows[0].get("a"), Some(&Value::from("y")));
        assert_eq!(rows[0].get("b"), Some(&Value::from("x")));
        assert_eq!(rows[0].get_value(1), Some(&Value::from("x")));
    }

    #[test]
    fn same_column_is_a_no_op() {
        let rows = Swap::new("a", "a").execute(vec![row("x", "y")]).unwrap();
        assert_eq!(rows, vec![row("x", "y")]);
    }

    #[test]
    fn left_is_checked_before_right() {
        let error = Swap::new("left_gone", "right_gone")
            .execute(vec![row("x", "y")])
            .unwrap_err();
        assert_eq!(error.missing_column(), Some("left_gone"));
    }

    #[test]
    fn transform_exchanges_bindings() {
        let swapped = Swap::new("a", "b").transform(&pushdown(), &relation()).unwrap();

        assert_eq!(swapped.columns(), ["id", "a", "b"]);
        let rows = swapped.materialize().unwrap();
        assert_eq!(rows[0].get("a"), Some(&Value::from("y")));
        assert_eq!(rows[0].get("b"), Some(&Value::from("x")));
        assert_eq!(rows[0].width(), 3);
    }

    #[test]
    fn transform_rejects_missing_columns() {
        let error = Swap::new("a", "zz")
            .transform(&pushdown(), &relation())
            .unwrap_err();
        assert_eq!(
            error,
            RelationError::ColumnNotFound {
                directive: "swap".into(),
                column: "zz".into(),
                relation: "input".into(),
            }
        );
    }

    #[test]
    fn transform_rejects_temp_collision() {
        let factory = ColumnExpressionFactory;
        let crowded = relation().set_column(SWAP_TEMP_COLUMN, &factory.column("id").unwrap());
        let error = Swap::new("a", "b").transform(&pushdown(), &crowded).unwrap_err();
        assert!(matches!(
            error,
            RelationError::TemporaryColumnCollision { column, .. } if column == SWAP_TEMP_COLUMN
        ));
    }

    #[test]
    fn columns_with_spaces_compile() {
        let df = DataFrame::new(vec![
            Series::new("first name".into(), vec!["Ada"]).into_column(),
            Series::new("last name".into(), vec!["Lovelace"]).into_column(),
        ])
        .unwrap();
        let swapped = Swap::new("first name", "last name")
            .transform(&pushdown(), &Relation::from_frame("people", df))
            .unwrap();
        let rows = swapped.materialize().unwrap();
        assert_eq!(rows[0].get("first name"), Some(&Value::from("Lovelace")));
    }
}
