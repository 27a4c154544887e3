//! Recipe execution with explicit stages.
//!
//! 1. **Read**: load the input CSV into a frame
//! 2. **Compose**: parse and bind each recipe step
//! 3. **Run**: push steps down into the lazy plan while they compile, then
//!    continue row by row from the first step that cannot
//! 4. **Report**: collect each step's lineage

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use serde::Serialize;
use tracing::{debug, info, info_span, trace, warn};

use wrangle_directives::{DirectiveRegistry, Step};
use wrangle_model::{Mutation, Row};
use wrangle_relational::{ExpressionFactory, Relation, RelationalContext};

use crate::logging::redact_value;

/// Name given to the relation built from the input file.
pub const INPUT_RELATION: &str = "input";

/// How a step ended up being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Folded into the lazy plan.
    Pushdown,
    /// Executed batch by batch.
    RowWise,
    /// Pushdown was requested but the step could not compile.
    Fallback,
}

impl ExecutionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pushdown => "pushdown",
            Self::RowWise => "row-wise",
            Self::Fallback => "fallback",
        }
    }
}

/// Outcome of one recipe step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: String,
    pub directive: String,
    pub mode: ExecutionMode,
    pub lineage: Option<Mutation>,
}

/// Options for [`run_recipe`].
#[derive(Clone)]
pub struct RunOptions {
    /// Try to fold steps into the lazy plan first.
    pub pushdown: bool,
    pub expression_factory: Option<Arc<dyn ExpressionFactory>>,
    /// Rows per row-wise batch; zero is treated as one.
    pub batch_size: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            pushdown: false,
            expression_factory: None,
            batch_size: 1024,
        }
    }
}

/// Result of a recipe run.
#[derive(Debug)]
pub struct RunResult {
    pub rows: Vec<Row>,
    pub steps: Vec<StepReport>,
}

/// A recipe step paired with the text it was composed from.
#[derive(Debug)]
pub struct RecipeStep {
    pub text: String,
    pub step: Step,
}

/// Read a CSV file with a header row.
pub fn read_input(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("open {}", path.display()))?
        .finish()
        .with_context(|| format!("read {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read input"
    );
    Ok(df)
}

/// Parse and bind every step of a recipe.
///
/// Fails on the first step that does not parse or bind; steps composed before
/// it are destroyed.
pub fn compose_steps(registry: &DirectiveRegistry, texts: &[String]) -> Result<Vec<RecipeStep>> {
    let mut steps: Vec<RecipeStep> = Vec::with_capacity(texts.len());
    for (idx, text) in texts.iter().enumerate() {
        match registry.compose(text) {
            Ok(step) => steps.push(RecipeStep {
                text: text.trim().to_string(),
                step,
            }),
            Err(error) => {
                destroy_steps(&mut steps);
                return Err(error).with_context(|| format!("step {}: {text}", idx + 1));
            }
        }
    }
    info!(steps = steps.len(), "composed recipe");
    Ok(steps)
}

/// Release every step. Safe to call more than once.
pub fn destroy_steps(steps: &mut [RecipeStep]) {
    for recipe_step in steps {
        recipe_step.step.destroy();
    }
}

/// Run `steps` over `df`.
///
/// With pushdown enabled, leading steps are folded into one lazy plan. The
/// first step that reports it cannot compile (no expression factory, or no
/// relational form) materializes the plan and runs row-wise, together with
/// every step after it. Any other relational error aborts the run.
pub fn run_recipe(df: DataFrame, steps: &[RecipeStep], options: &RunOptions) -> Result<RunResult> {
    let span = info_span!("recipe", steps = steps.len(), pushdown = options.pushdown);
    let _guard = span.enter();
    let start = Instant::now();

    let mut reports = Vec::with_capacity(steps.len());
    let mut pushed = 0usize;
    let mut fallback = false;
    let mut relation = Relation::from_frame(INPUT_RELATION, df);

    if options.pushdown {
        let mut context = RelationalContext::new();
        if let Some(factory) = &options.expression_factory {
            context = context.with_expression_factory(Arc::clone(factory));
        }
        for recipe_step in steps {
            match recipe_step.step.transform(&context, &relation) {
                Ok(next) => {
                    relation = next;
                    reports.push(report(recipe_step, ExecutionMode::Pushdown)?);
                    pushed += 1;
                }
                Err(error) if error.is_fallback() => {
                    warn!(step = %recipe_step.text, %error, "pushdown unavailable, running row-wise");
                    fallback = true;
                    break;
                }
                Err(error) => {
                    return Err(error).with_context(|| format!("step {}", recipe_step.text));
                }
            }
        }
    }

    let mut rows = relation.materialize().context("materialize relation")?;
    let remaining = &steps[pushed..];
    if !remaining.is_empty() {
        rows = run_row_wise(rows, remaining, options.batch_size)?;
        for (idx, recipe_step) in remaining.iter().enumerate() {
            let mode = if fallback && idx == 0 {
                ExecutionMode::Fallback
            } else {
                ExecutionMode::RowWise
            };
            reports.push(report(recipe_step, mode)?);
        }
    }

    if let Some(row) = rows.first() {
        trace!(first_row = %redact_value(&format_row(row)), "output sample");
    }
    info!(
        rows = rows.len(),
        pushed_down = pushed,
        duration_ms = start.elapsed().as_millis(),
        "recipe complete"
    );
    Ok(RunResult {
        rows,
        steps: reports,
    })
}

fn run_row_wise(rows: Vec<Row>, steps: &[RecipeStep], batch_size: usize) -> Result<Vec<Row>> {
    let total = rows.len();
    let mut output = Vec::with_capacity(total);
    for (batch_idx, batch) in into_batches(rows, batch_size).into_iter().enumerate() {
        debug!(batch = batch_idx, rows = batch.len(), "row-wise batch");
        let mut batch = batch;
        for recipe_step in steps {
            batch = recipe_step
                .step
                .execute(batch)
                .with_context(|| format!("step {}", recipe_step.text))?;
        }
        output.extend(batch);
    }
    Ok(output)
}

/// Split rows into owned batches of at most `size` rows.
pub fn into_batches(rows: Vec<Row>, size: usize) -> Vec<Vec<Row>> {
    let size = size.max(1);
    let mut batches = Vec::with_capacity(rows.len().div_ceil(size));
    let mut current = Vec::with_capacity(size.min(rows.len()));
    for row in rows {
        current.push(row);
        if current.len() == size {
            batches.push(std::mem::replace(&mut current, Vec::with_capacity(size)));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

fn report(recipe_step: &RecipeStep, mode: ExecutionMode) -> Result<StepReport> {
    let lineage = recipe_step
        .step
        .lineage()
        .with_context(|| format!("lineage for {}", recipe_step.text))?;
    Ok(StepReport {
        step: recipe_step.text.clone(),
        directive: recipe_step.step.name().to_string(),
        mode,
        lineage,
    })
}

fn format_row(row: &Row) -> String {
    row.cells()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrangle_model::Value;

    #[test]
    fn batches_keep_order_and_remainder() {
        let rows: Vec<Row> = (0..5_i64).map(|idx| Row::new().with("n", idx)).collect();
        let batches = into_batches(rows, 2);
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, [2, 2, 1]);
        assert_eq!(batches[2][0].get("n"), Some(&Value::Int(4)));
    }

    #[test]
    fn zero_batch_size_means_one_row() {
        let rows: Vec<Row> = (0..3_i64).map(|idx| Row::new().with("n", idx)).collect();
        assert_eq!(into_batches(rows, 0).len(), 3);
    }

    #[test]
    fn mode_names_match_serialization() {
        for mode in [
            ExecutionMode::Pushdown,
            ExecutionMode::RowWise,
            ExecutionMode::Fallback,
        ] {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }
}
