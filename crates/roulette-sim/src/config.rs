//! Simulator configuration.

use crate::error::{SimError, SimResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Martingale simulation parameters.
///
/// Any seed left unset is drawn at random; a run is reproducible only
/// when all three are fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Bet log destination.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Upper bound on rounds played.
    #[serde(default = "default_total_bets")]
    pub total_bets: u64,
    #[serde(default = "default_start_balance")]
    pub start_balance: Decimal,
    /// Stake after a win and at the start.
    #[serde(default = "default_base_bet")]
    pub base_bet: Decimal,
    /// Stake multiplier applied after each loss.
    #[serde(default = "default_increase_on_loss")]
    pub increase_on_loss: Decimal,
    /// Log progress every N bets (0 disables).
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
    /// Rows buffered before the log writer flushes.
    #[serde(default = "default_write_buffer")]
    pub write_buffer: usize,
    #[serde(default)]
    pub server_seed: Option<String>,
    #[serde(default)]
    pub client_seed: Option<String>,
    #[serde(default)]
    pub start_nonce: Option<u64>,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("roulette_log.csv")
}

fn default_total_bets() -> u64 {
    100_000_000
}

fn default_start_balance() -> Decimal {
    Decimal::from(20_000_000)
}

fn default_base_bet() -> Decimal {
    // 0.0016
    Decimal::new(16, 4)
}

fn default_increase_on_loss() -> Decimal {
    Decimal::TWO
}

fn default_progress_interval() -> u64 {
    250_000
}

fn default_write_buffer() -> usize {
    10_000
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            total_bets: default_total_bets(),
            start_balance: default_start_balance(),
            base_bet: default_base_bet(),
            increase_on_loss: default_increase_on_loss(),
            progress_interval: default_progress_interval(),
            write_buffer: default_write_buffer(),
            server_seed: None,
            client_seed: None,
            start_nonce: None,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.start_balance <= Decimal::ZERO {
            return Err(SimError::InvalidConfig(format!(
                "start_balance must be positive, got {}",
                self.start_balance
            )));
        }
        if self.base_bet <= Decimal::ZERO {
            return Err(SimError::InvalidConfig(format!(
                "base_bet must be positive, got {}",
                self.base_bet
            )));
        }
        if self.base_bet > self.start_balance {
            return Err(SimError::InvalidConfig(
                "base_bet exceeds start_balance".to_string(),
            ));
        }
        if self.increase_on_loss < Decimal::ONE {
            return Err(SimError::InvalidConfig(format!(
                "increase_on_loss must be at least 1, got {}",
                self.increase_on_loss
            )));
        }
        Ok(())
    }

    /// True when every seed component is fixed.
    pub fn is_deterministic(&self) -> bool {
        self.server_seed.is_some() && self.client_seed.is_some() && self.start_nonce.is_some()
    }
}
