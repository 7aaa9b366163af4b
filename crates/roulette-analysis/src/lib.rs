//! Aggregation and summary views over roulette bet logs.
//!
//! - `Aggregator`: bins large logs into a bounded number of averaged points
//! - `stats`: frequency counts and linear-interpolation quantiles
//! - `views`: the six report charts, expressed as backend-neutral `Chart`s

pub mod aggregate;
pub mod chart;
pub mod error;
pub mod stats;
pub mod views;

pub use aggregate::{Aggregated, Aggregator, Bin, DEFAULT_BIN_TARGET};
pub use chart::{
    Bar, BarChart, Chart, ChartBody, ChartId, LineChart, Marker, MarkerAnchor, PieChart, PieSlice,
    Rgb,
};
pub use error::{AnalysisError, AnalysisResult};
pub use stats::{quantile_from_counts, value_counts};
pub use views::{build_charts, LosingStreakStats};
