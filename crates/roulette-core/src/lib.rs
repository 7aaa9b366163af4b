//! Core domain types for roulette log analysis.
//!
//! This crate provides the types shared by the simulator and the analyzer:
//! - `BetRecord`: one row of the bet log
//! - `Outcome`: win / lose / push
//! - `Amount`: precision-safe balance and stake values
//! - `Pocket`: the single-zero wheel with color and parity

pub mod decimal;
pub mod error;
pub mod record;
pub mod wheel;

pub use decimal::{Amount, LOG_SCALE};
pub use error::{CoreError, Result};
pub use record::{BetRecord, Outcome};
pub use wheel::{Color, Parity, Pocket, MAX_ROLL, POCKET_COUNT};
