//! Structured logging and progress reporting.
//!
//! - Structured JSON / pretty logging with tracing
//! - Determinate progress bars for chunked loading and chart rendering

pub mod error;
pub mod logging;
pub mod progress;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use progress::ProgressReporter;
