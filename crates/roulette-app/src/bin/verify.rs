//! Recompute one provably-fair roulette spin from its seeds.

use anyhow::Result;
use clap::Parser;
use roulette_sim::SpinGenerator;

/// Verify a roulette spin
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Revealed server seed
    #[arg(long)]
    server_seed: String,

    /// Client seed
    #[arg(long)]
    client_seed: String,

    /// Bet nonce
    #[arg(long)]
    nonce: u64,

    /// Byte offset into the HMAC stream
    #[arg(long, default_value_t = 0)]
    cursor: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let generator = SpinGenerator::new(&args.server_seed, &args.client_seed)?;
    let pocket = generator.spin(args.nonce, args.cursor)?;

    println!(
        "Roulette Result: {} ({}, {})",
        pocket.number, pocket.color, pocket.parity
    );
    Ok(())
}
