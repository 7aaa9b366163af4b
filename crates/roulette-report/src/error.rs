//! Report error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Chart render error ({chart}): {message}")]
    Render { chart: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
