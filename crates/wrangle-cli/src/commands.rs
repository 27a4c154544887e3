use std::sync::Arc;

use anyhow::Result;
use tracing::info_span;

use wrangle_cli::pipeline::{
    RunOptions, RunResult, compose_steps, destroy_steps, read_input, run_recipe,
};
use wrangle_directives::default_registry;
use wrangle_relational::{ColumnExpressionFactory, ExpressionFactory};

use crate::cli::{EngineArg, RunArgs};
use crate::summary::directives_table;

pub fn run_directives() -> Result<()> {
    println!("{}", directives_table(default_registry()));
    Ok(())
}

pub fn run_recipe_file(args: &RunArgs) -> Result<RunResult> {
    let span = info_span!("run", input = %args.input.display());
    let _guard = span.enter();

    let df = read_input(&args.input)?;
    let mut steps = compose_steps(default_registry(), &args.steps)?;
    let options = RunOptions {
        pushdown: args.pushdown,
        expression_factory: expression_factory(args.engine),
        batch_size: args.batch_size,
    };
    let result = run_recipe(df, &steps, &options);
    destroy_steps(&mut steps);
    result
}

fn expression_factory(engine: EngineArg) -> Option<Arc<dyn ExpressionFactory>> {
    match engine {
        EngineArg::Sql => Some(Arc::new(ColumnExpressionFactory)),
        EngineArg::None => None,
    }
}
