//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] roulette_persistence::PersistenceError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] roulette_analysis::AnalysisError),

    #[error("Report error: {0}")]
    Report(#[from] roulette_report::ReportError),

    #[error("Simulation error: {0}")]
    Sim(#[from] roulette_sim::SimError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] roulette_telemetry::TelemetryError),
}

pub type AppResult<T> = Result<T, AppError>;
