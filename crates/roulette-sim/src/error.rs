//! Simulator error types.

use roulette_core::CoreError;
use roulette_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid simulator config: {0}")]
    InvalidConfig(String),

    #[error("Invalid server seed key: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

pub type SimResult<T> = Result<T, SimError>;
