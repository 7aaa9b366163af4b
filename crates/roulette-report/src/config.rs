//! Report configuration.

use roulette_analysis::Chart;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a single chart is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    /// Plotly markup, library loaded from the CDN.
    Interactive,
    /// Inline base64 image.
    Static,
}

/// Render mode for the whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Trend charts static, distributions interactive.
    #[default]
    Mixed,
    Interactive,
    Static,
}

impl RenderMode {
    pub fn mode_for(&self, chart: &Chart) -> ChartMode {
        match self {
            RenderMode::Interactive => ChartMode::Interactive,
            RenderMode::Static => ChartMode::Static,
            // dense trend lines are cheaper as a picture than as 50k DOM points
            RenderMode::Mixed if chart.is_trend() => ChartMode::Static,
            RenderMode::Mixed => ChartMode::Interactive,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output HTML path.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default)]
    pub render_mode: RenderMode,
    /// Page heading.
    #[serde(default = "default_title")]
    pub title: String,
    /// Static image width in pixels.
    #[serde(default = "default_static_width")]
    pub static_width: u32,
    /// Static image height in pixels.
    #[serde(default = "default_static_height")]
    pub static_height: u32,
    /// Interactive chart height in pixels.
    #[serde(default = "default_interactive_height")]
    pub interactive_height: u32,
    /// Plotly bundle URL.
    #[serde(default = "default_plotly_cdn")]
    pub plotly_cdn: String,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("analysis_report.html")
}

fn default_title() -> String {
    "Roulette Simulation Analysis Report".to_string()
}

fn default_static_width() -> u32 {
    1200
}

fn default_static_height() -> u32 {
    600
}

fn default_interactive_height() -> u32 {
    500
}

fn default_plotly_cdn() -> String {
    "https://cdn.plot.ly/plotly-2.35.0.min.js".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            render_mode: RenderMode::default(),
            title: default_title(),
            static_width: default_static_width(),
            static_height: default_static_height(),
            interactive_height: default_interactive_height(),
            plotly_cdn: default_plotly_cdn(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ReportConfig = toml::from_str(r#"render_mode = "static""#).unwrap();
        assert_eq!(config.render_mode, RenderMode::Static);
        assert_eq!(config.static_width, 1200);
        assert_eq!(config.output_path, PathBuf::from("analysis_report.html"));
    }
}
