//! Telemetry error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Logging initialization failed: {0}")]
    LoggingInit(String),

    #[error("Progress template error: {0}")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
