//! Command-line surface: argument parsing, logging setup and the run entrypoint.

use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};

use crate::config::RunConfig;
use crate::error::SalesResult;
use crate::pipeline::{run_pipeline, RunSummary};

/// Aggregate daily sales records into per-branch and per-commodity totals.
#[derive(Parser, Debug)]
#[command(name = "calculate-sales", version)]
pub struct Cli {
    /// Directory holding the definition lists and the sales record files
    pub dir: PathBuf,

    /// YAML file describing the master categories and record extension
    #[arg(long, env = "CALCULATE_SALES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log progress to stderr (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Installs a stderr subscriber. Silent unless `verbose` is set, so the one
/// failure line stays the only output by default.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

pub fn run(cli: &Cli) -> SalesResult<RunSummary> {
    let config = match &cli.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };

    let result = run_pipeline(&cli.dir, &config);
    match &result {
        Ok(summary) => info!(?summary, "Run completed"),
        Err(e) => error!(error = ?e, "Run aborted"),
    }
    result
}
