//! Analysis error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Dataset is empty: the log has a header but no bets")]
    EmptyDataset,

    #[error("Bin target must be positive")]
    InvalidBinTarget,

    #[error("Quantile out of [0, 1]: {0}")]
    InvalidQuantile(f64),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
