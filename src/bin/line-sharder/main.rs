mod commands;
mod logging;
mod progress;

use std::process;

use clap::Parser;
use colored::*;
use commands::Cli;
use dotenv::dotenv;
use line_sharder::config::load_configuration;
use line_sharder::{Error, ShardConfig, ShardEngine};
use progress::CliReporter;
use tracing::{debug, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(args: &Cli) -> Result<(), Error> {
    let config = build_config(args)?;
    debug!("Configuration: {:?}", config);

    if !args.input.exists() {
        return Err(Error::InputNotFound(args.input.clone()));
    }

    let engine = ShardEngine::new(config);
    let reporter = CliReporter::new();

    println!("Creating parent directory: {}", engine.root_dir(&args.input)?.display());
    println!("Using {} CPU cores for processing...", engine.worker_count());

    let result = engine.run(&args.input, &reporter)?;
    print!("{}", result.summary);

    info!(
        "{} lines read, {} distinct in {} buckets",
        format!("{}", result.ingest_stats.lines_read).cyan(),
        format!("{}", result.ingest_stats.distinct_lines).cyan(),
        format!("{}", result.ingest_stats.buckets).cyan(),
    );
    info!(
        "Read: {}, Write: {}",
        format!("{:.2}s", result.ingest_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.flush_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files written, {} failed",
        format!("{}", result.summary.written()).green(),
        format!("{}", result.summary.failed()).red(),
    );

    Ok(())
}

/// Defaults, then the optional config file, then command line flags.
fn build_config(args: &Cli) -> Result<ShardConfig, Error> {
    let mut config = load_configuration(args.config.as_deref())?;
    if args.workers.is_some() {
        config.workers = args.workers;
    }
    if args.output_dir.is_some() {
        config.output_dir = args.output_dir.clone();
    }
    Ok(config)
}
