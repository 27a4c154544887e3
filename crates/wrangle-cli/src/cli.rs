//! CLI argument definitions for the wrangle runner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;
use wrangle_cli::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "wrangle",
    version,
    about = "Run wrangling directives over a CSV file",
    long_about = "Run a recipe of wrangling directives over a CSV file.\n\n\
                  Steps run row by row, or are pushed down into the polars \
                  lazy engine with --pushdown. Each step's lineage is reported."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run recipe steps over a CSV file and print the result.
    Run(RunArgs),

    /// List registered directives and their usage.
    Directives,
}

#[derive(Parser)]
pub struct RunArgs {
    /// CSV file with a header row.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Recipe step, e.g. "swap :a :b". Repeat for more steps.
    #[arg(long = "step", short = 's', value_name = "STEP", required = true)]
    pub steps: Vec<String>,

    /// Fold steps into the relational plan instead of running row by row.
    #[arg(long = "pushdown")]
    pub pushdown: bool,

    /// Expression engine offered to pushdown steps.
    #[arg(long = "engine", value_enum, default_value = "sql")]
    pub engine: EngineArg,

    /// Rows per batch for row-wise execution.
    #[arg(long = "batch-size", value_name = "ROWS", default_value_t = 1024)]
    pub batch_size: usize,

    /// Maximum number of rows to print.
    #[arg(long = "limit", value_name = "ROWS", default_value_t = 20)]
    pub limit: usize,

    /// Print lineage as JSON instead of sentences.
    #[arg(long = "lineage-json")]
    pub lineage_json: bool,
}

/// Expression engines available to pushdown.
#[derive(Clone, Copy, ValueEnum)]
pub enum EngineArg {
    /// SQL-style column expressions compiled to polars.
    Sql,
    /// No expression factory; pushdown steps fall back to row-wise.
    None,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_collects_repeated_steps() {
        let cli = Cli::try_parse_from([
            "wrangle",
            "--log-level",
            "debug",
            "run",
            "data.csv",
            "--step",
            "swap :a :b",
            "-s",
            "swap :b :c",
            "--pushdown",
            "--engine",
            "none",
        ])
        .unwrap();

        assert_eq!(LevelFilter::from(cli.log_level.unwrap()), LevelFilter::DEBUG);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.steps, ["swap :a :b", "swap :b :c"]);
        assert!(args.pushdown);
        assert!(matches!(args.engine, EngineArg::None));
        assert_eq!(args.batch_size, 1024);
    }

    #[test]
    fn run_requires_a_step() {
        assert!(Cli::try_parse_from(["wrangle", "run", "data.csv"]).is_err());
    }
}
