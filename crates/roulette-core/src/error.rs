//! Error types for roulette-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid pocket number: {0} (expected 0-36)")]
    InvalidPocket(u8),

    #[error("Spin value out of [0, 1): {0}")]
    InvalidUnitFloat(f64),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
