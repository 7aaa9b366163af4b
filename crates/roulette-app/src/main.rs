//! Roulette bet log analyzer - Entry Point
//!
//! Reads the simulator's CSV bet log and writes a self-contained HTML report.

use anyhow::Result;
use clap::Parser;
use roulette_app::{Analyzer, AppConfig};
use std::path::PathBuf;
use tracing::info;

/// Roulette bet log analyzer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ROULETTE_CONFIG env var)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bet log CSV to analyze
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// HTML report destination
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, source) = AppConfig::load(args.config.as_deref())?;
    roulette_telemetry::init_logging(&config.telemetry.log_level)?;

    info!("Starting roulette-report v{}", env!("CARGO_PKG_VERSION"));
    source.log();

    if let Some(input) = args.input {
        config.input.path = input;
    }
    if let Some(output) = args.output {
        config.report.output_path = output;
    }
    info!(
        input = %config.input.path.display(),
        output = %config.report.output_path.display(),
        render_mode = ?config.report.render_mode,
        bin_target = config.aggregation.bin_target,
        "Configuration loaded"
    );

    let run = Analyzer::new(config)?.run()?;
    info!(
        path = %run.output_path.display(),
        total_bets = run.total_bets,
        binned = run.binned,
        "Done"
    );

    Ok(())
}
