//! Roulette bet log analyzer and simulator.
//!
//! Binaries:
//! - `roulette-report`: bet log CSV to a self-contained HTML report
//! - `roulette-sim`: martingale simulation producing a bet log
//! - `roulette-verify`: recompute a single provably-fair spin

pub mod app;
pub mod config;
pub mod error;

pub use app::{run_simulation, Analyzer, ReportRun};
pub use config::{AggregationConfig, AppConfig, ConfigSource, InputConfig, TelemetryConfig};
pub use error::{AppError, AppResult};
