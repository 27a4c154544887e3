//! Behaviour of the `swap` directive across row-wise, relational and lineage modes.

use std::sync::Arc;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;

use wrangle_directives::column::Swap;
use wrangle_directives::{Directive, LineageReportable, RelationCompilable, default_registry};
use wrangle_model::{ExecutionError, Row, Value};
use wrangle_relational::{
    ColumnExpressionFactory, Relation, RelationError, RelationalContext, rows_from_frame,
};

fn test_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    DataFrame::new(cols).unwrap()
}

fn pushdown() -> RelationalContext {
    RelationalContext::new().with_expression_factory(Arc::new(ColumnExpressionFactory))
}

/// Column name -> value view of a row, independent of positional order.
fn bindings(row: &Row) -> Vec<(String, Value)> {
    let mut cells: Vec<(String, Value)> = row
        .cells()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    cells.sort_by(|a, b| a.0.cmp(&b.0));
    cells
}

#[test]
fn end_to_end_example() {
    let step = default_registry().compose("swap :a :b").unwrap();
    let input = vec![Row::new().with("id", 1_i64).with("a", "x").with("b", "y")];

    let output = step.execute(input).unwrap();

    let by_schema: Vec<Option<&Value>> = ["id", "a", "b"]
        .iter()
        .map(|name| output[0].get(name))
        .collect();
    assert_eq!(
        by_schema,
        vec![
            Some(&Value::Int(1)),
            Some(&Value::from("y")),
            Some(&Value::from("x"))
        ]
    );

    let lineage = step.lineage().unwrap().unwrap();
    assert_eq!(lineage.readable, "Swapped columns 'a' and 'b'");
    assert_eq!(lineage.edges(), vec![("a", "b"), ("b", "a")]);
}

#[test]
fn missing_column_stops_the_batch() {
    let swap = Swap::new("a", "b");
    let mut rows = vec![
        Row::new().with("a", 1_i64).with("b", 2_i64),
        Row::new().with("a", 3_i64).with("c", 4_i64),
        Row::new().with("a", 5_i64).with("b", 6_i64),
    ];

    let error = swap.apply(&mut rows).unwrap_err();

    assert_eq!(
        error,
        ExecutionError::ColumnNotFound {
            directive: "swap".into(),
            column: "b".into(),
        }
    );
    // In-place and non-transactional: earlier rows keep the swap.
    assert_eq!(rows[0].columns().collect::<Vec<_>>(), ["b", "a"]);
    assert_eq!(rows[1].columns().collect::<Vec<_>>(), ["a", "c"]);
    assert_eq!(rows[2].columns().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn relational_matches_row_wise() {
    let df = test_df(vec![
        ("id", vec!["1", "2", "3"]),
        ("a", vec!["x1", "x2", "x3"]),
        ("b", vec!["y1", "y2", "y3"]),
        ("c", vec!["z1", "z2", "z3"]),
    ]);
    let swap = Swap::new("a", "c");

    let row_wise = swap.execute(rows_from_frame(&df).unwrap()).unwrap();
    let relational = swap
        .transform(&pushdown(), &Relation::from_frame("input", df))
        .unwrap()
        .materialize()
        .unwrap();

    assert_eq!(row_wise.len(), relational.len());
    for (left, right) in row_wise.iter().zip(&relational) {
        assert_eq!(bindings(left), bindings(right));
    }
}

#[test]
fn selector_like_names_swap_literally() {
    let df = test_df(vec![
        ("*", vec!["s1", "s2"]),
        ("^a$", vec!["r1", "r2"]),
        ("a", vec!["a1", "a2"]),
        ("b", vec!["b1", "b2"]),
    ]);

    for (left, right) in [("*", "b"), ("b", "*"), ("^a$", "a"), ("a", "^a$"), ("*", "^a$")] {
        let swap = Swap::new(left, right);
        let row_wise = swap.execute(rows_from_frame(&df).unwrap()).unwrap();
        let relational = swap
            .transform(&pushdown(), &Relation::from_frame("input", df.clone()))
            .unwrap()
            .materialize()
            .unwrap();

        assert_eq!(row_wise.len(), relational.len());
        for (row, pushed) in row_wise.iter().zip(&relational) {
            assert_eq!(bindings(row), bindings(pushed), "swap {left} {right}");
        }
        assert_eq!(relational[0].width(), 4);
    }
}

#[test]
fn fallback_without_expression_factory() {
    let df = test_df(vec![("a", vec!["x"]), ("b", vec!["y"])]);
    let relation = Relation::from_frame("input", df);

    let error = Swap::new("a", "b")
        .transform(&RelationalContext::new(), &relation)
        .unwrap_err();

    assert_eq!(
        error,
        RelationError::NoExpressionFactory {
            directive: "swap".into()
        }
    );
    assert!(error.is_fallback());
    assert_eq!(relation.columns(), ["a", "b"]);
    let rows = relation.materialize().unwrap();
    assert_eq!(rows[0].get("a"), Some(&Value::from("x")));
}

#[test]
fn lineage_is_static() {
    let swap = Swap::new("a", "b");
    let before = serde_json::to_string(&swap.lineage()).unwrap();

    for _ in 0..3 {
        swap.execute(vec![Row::new().with("a", 1_i64).with("b", 2_i64)])
            .unwrap();
    }
    let after = serde_json::to_string(&swap.lineage()).unwrap();

    assert_eq!(before, after);
    insta::assert_snapshot!(
        after,
        @r#"{"readable":"Swapped columns 'a' and 'b'","relations":[{"outputs":["a"],"inputs":["b"]},{"outputs":["b"],"inputs":["a"]}]}"#
    );
}

fn row_strategy() -> impl Strategy<Value = (Row, usize, usize)> {
    (2usize..8).prop_flat_map(|width| {
        (
            proptest::collection::vec(any::<i64>(), width),
            0..width,
            0..width,
        )
            .prop_map(|(values, left, right)| {
                let row: Row = values
                    .into_iter()
                    .enumerate()
                    .map(|(idx, value)| (format!("c{idx}"), value))
                    .collect();
                (row, left, right)
            })
    })
}

proptest! {
    #[test]
    fn swapping_twice_restores_labels((row, left, right) in row_strategy()) {
        let swap = Swap::new(format!("c{left}"), format!("c{right}"));
        let once = swap.execute(vec![row.clone()]).unwrap();
        let twice = swap.execute(once).unwrap();
        prop_assert_eq!(&twice[0], &row);
    }

    #[test]
    fn swapping_preserves_values((row, left, right) in row_strategy()) {
        let (left, right) = (format!("c{left}"), format!("c{right}"));
        let swapped = Swap::new(left.as_str(), right.as_str())
            .execute(vec![row.clone()])
            .unwrap();
        let swapped = &swapped[0];

        prop_assert_eq!(swapped.width(), row.width());
        prop_assert_eq!(swapped.get(&right), row.get(&left));
        prop_assert_eq!(swapped.get(&left), row.get(&right));
        for idx in 0..row.width() {
            prop_assert_eq!(swapped.get_value(idx), row.get_value(idx));
        }
    }
}
