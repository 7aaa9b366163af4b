//! Martingale roulette simulator.
//!
//! Plays provably-fair spins and writes one CSV row per bet.

use anyhow::Result;
use clap::Parser;
use roulette_app::{run_simulation, AppConfig};
use std::path::PathBuf;
use tracing::info;

/// Roulette martingale simulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ROULETTE_CONFIG env var)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of bets to play
    #[arg(short, long)]
    bets: Option<u64>,

    /// Bet log CSV destination
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, source) = AppConfig::load(args.config.as_deref())?;
    roulette_telemetry::init_logging(&config.telemetry.log_level)?;

    info!("Starting roulette-sim v{}", env!("CARGO_PKG_VERSION"));
    source.log();

    let sim = &mut config.sim;
    if let Some(bets) = args.bets {
        sim.total_bets = bets;
    }
    if let Some(output) = args.output {
        sim.output_path = output;
    }

    let summary = run_simulation(sim)?;
    info!(
        path = %sim.output_path.display(),
        rows = summary.rows_logged,
        busted = summary.busted,
        "Bet log written"
    );

    Ok(())
}
