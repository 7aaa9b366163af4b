//! Provably-fair roulette simulator.
//!
//! Produces the bet log consumed by the analysis pipeline:
//! - `fairness`: HMAC-SHA256 byte stream and spin derivation
//! - `engine`: martingale bankroll state, bust detection, run summary

pub mod config;
pub mod engine;
pub mod error;
pub mod fairness;

pub use config::SimConfig;
pub use engine::{settle, BetState, SimSummary, Simulator};
pub use error::{SimError, SimResult};
pub use fairness::{ByteStream, Seeds, SpinGenerator};
