//! Determinate progress reporting.
//!
//! Wraps an `indicatif` bar and mirrors each step into the tracing log so
//! that runs without a terminal (CI, redirected stderr) still show progress.

use crate::error::TelemetryResult;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

const BAR_TEMPLATE: &str = "{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress over a known number of steps.
pub struct ProgressReporter {
    bar: ProgressBar,
    label: &'static str,
}

impl ProgressReporter {
    /// Create a visible bar with `total` steps.
    pub fn new(label: &'static str, total: u64) -> TelemetryResult<Self> {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)?
                .progress_chars("#>-"),
        );
        bar.set_prefix(label);
        Ok(Self { bar, label })
    }

    /// Create a reporter that never draws.
    pub fn hidden(label: &'static str, total: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total);
        Self { bar, label }
    }

    /// Raise the total when the pre-scan underestimated it.
    pub fn ensure_length(&self, at_least: u64) {
        if self.bar.length().map_or(true, |len| len < at_least) {
            self.bar.set_length(at_least);
        }
    }

    /// Advance by one step.
    pub fn step(&self, message: impl Into<String>) {
        let message = message.into();
        self.bar.inc(1);
        debug!(
            label = self.label,
            position = self.bar.position(),
            total = self.bar.length().unwrap_or(0),
            %message,
            "Progress"
        );
        self.bar.set_message(message);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
