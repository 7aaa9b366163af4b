//! Self-contained HTML report.
//!
//! The whole document is assembled in memory and written once through a
//! temporary sibling file, so a failed run never leaves a half-written
//! report behind.

use crate::config::{ChartMode, ReportConfig};
use crate::error::ReportResult;
use crate::render::{escape_html, ChartRenderer, PlotlyRenderer, SvgRenderer};
use chrono::{DateTime, Utc};
use roulette_analysis::{Chart, ChartId};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PAGE_TITLE: &str = "Roulette Analysis";

const STYLE: &str = "body{font-family:Arial,sans-serif;margin:2em;background-color:#f4f4f4;}\
h1{text-align:center;}\
.chart-container{width:90%;margin:2em auto;border:1px solid #ddd;\
box-shadow:0 4px 8px 0 rgba(0,0,0,0.2);background-color:white;padding:1em;}\
footer{text-align:center;color:#666;font-size:0.9em;margin-top:2em;}";

/// One chart rendered to an HTML fragment.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub id: ChartId,
    pub mode: ChartMode,
    pub html: String,
}

/// Builds the report document from charts.
#[derive(Debug, Clone)]
pub struct HtmlReport {
    config: ReportConfig,
    plotly: PlotlyRenderer,
    svg: SvgRenderer,
}

impl HtmlReport {
    pub fn new(config: ReportConfig) -> Self {
        let plotly = PlotlyRenderer::new(config.interactive_height);
        let svg = SvgRenderer::new(config.static_width, config.static_height);
        Self {
            config,
            plotly,
            svg,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Render one chart with the backend its mode selects.
    pub fn render_chart(&self, chart: &Chart) -> ReportResult<RenderedChart> {
        let mode = self.config.render_mode.mode_for(chart);
        let renderer: &dyn ChartRenderer = match mode {
            ChartMode::Interactive => &self.plotly,
            ChartMode::Static => &self.svg,
        };
        let html = renderer.render(chart)?;
        debug!(
            chart = %chart.id,
            renderer = renderer.name(),
            bytes = html.len(),
            "Chart rendered"
        );
        Ok(RenderedChart {
            id: chart.id,
            mode,
            html,
        })
    }

    /// Render every chart, calling `on_chart` after each one.
    pub fn render_all<F>(&self, charts: &[Chart], mut on_chart: F) -> ReportResult<Vec<RenderedChart>>
    where
        F: FnMut(&RenderedChart),
    {
        let mut rendered = Vec::with_capacity(charts.len());
        for chart in charts {
            let fragment = self.render_chart(chart)?;
            on_chart(&fragment);
            rendered.push(fragment);
        }
        Ok(rendered)
    }

    /// Assemble the full document.
    pub fn assemble(
        &self,
        charts: &[RenderedChart],
        total_bets: usize,
        generated_at: DateTime<Utc>,
    ) -> String {
        let needs_plotly = charts.iter().any(|c| c.mode == ChartMode::Interactive);

        let mut html = String::with_capacity(charts.iter().map(|c| c.html.len()).sum::<usize>() + 4096);
        html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
        html.push_str(&format!("<title>{PAGE_TITLE}</title><style>{STYLE}</style>"));
        if needs_plotly {
            html.push_str(&format!(
                "<script src=\"{}\" charset=\"utf-8\"></script>",
                escape_html(&self.config.plotly_cdn)
            ));
        }
        html.push_str("</head><body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.config.title)));

        for chart in charts {
            html.push_str("<div class=\"chart-container\">");
            html.push_str(&chart.html);
            html.push_str("</div>\n");
        }

        html.push_str(&format!(
            "<footer>Generated {} &middot; {} bets analyzed</footer>\n",
            generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            total_bets
        ));
        html.push_str("</body></html>\n");
        html
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "report.html".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `html` to `path` via a temporary sibling and rename.
pub fn write_report(path: &Path, html: &str) -> ReportResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_sibling(path);
    if let Err(e) = fs::write(&tmp, html).and_then(|()| fs::rename(&tmp, path)) {
        warn!(path = %tmp.display(), error = %e, "Report write failed, removing temporary file");
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    info!(path = %path.display(), bytes = html.len(), "Report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderMode;
    use roulette_analysis::{BarChart, Bar, ChartBody, LineChart, Rgb};

    fn charts() -> Vec<Chart> {
        ChartId::ALL
            .iter()
            .map(|&id| {
                let body = if matches!(id, ChartId::BalanceTrend | ChartId::StreakProgression) {
                    ChartBody::Line(LineChart {
                        points: vec![(1.0, 10.0), (2.0, 12.0)],
                        color: Rgb::STEEL_BLUE,
                        baseline: None,
                    })
                } else {
                    ChartBody::Bar(BarChart {
                        bars: vec![Bar { x: 1, count: 3, color: Rgb::ORANGE }],
                        show_values: false,
                        x_range: None,
                        markers: Vec::new(),
                    })
                };
                Chart {
                    id,
                    title: id.slug().to_string(),
                    x_label: "x".to_string(),
                    y_label: "y".to_string(),
                    body,
                }
            })
            .collect()
    }

    fn report(mode: RenderMode) -> HtmlReport {
        HtmlReport::new(ReportConfig {
            render_mode: mode,
            static_width: 400,
            static_height: 300,
            ..Default::default()
        })
    }

    #[test]
    fn test_six_chart_containers() {
        let report = report(RenderMode::Mixed);
        let rendered = report.render_all(&charts(), |_| {}).unwrap();
        let html = report.assemble(&rendered, 42, Utc::now());

        assert_eq!(html.matches("<div class=\"chart-container\">").count(), 6);
        assert!(html.contains("<title>Roulette Analysis</title>"));
        assert!(html.contains("<h1>Roulette Simulation Analysis Report</h1>"));
        assert!(html.contains("42 bets analyzed"));
    }

    #[test]
    fn test_mixed_mode_static_trends() {
        let report = report(RenderMode::Mixed);
        let rendered = report.render_all(&charts(), |_| {}).unwrap();

        for chart in &rendered {
            let expected = match chart.id {
                ChartId::BalanceTrend | ChartId::StreakProgression => ChartMode::Static,
                _ => ChartMode::Interactive,
            };
            assert_eq!(chart.mode, expected, "{}", chart.id);
        }
        let html = report.assemble(&rendered, 1, Utc::now());
        assert_eq!(html.matches("cdn.plot.ly").count(), 1);
        assert_eq!(html.matches("data:image/svg+xml;base64,").count(), 2);
    }

    #[test]
    fn test_static_mode_skips_cdn() {
        let report = report(RenderMode::Static);
        let mut seen = 0;
        let rendered = report.render_all(&charts(), |_| seen += 1).unwrap();
        assert_eq!(seen, 6);

        let html = report.assemble(&rendered, 1, Utc::now());
        assert!(!html.contains("cdn.plot.ly"));
        assert!(!html.contains("Plotly.newPlot"));
    }

    #[test]
    fn test_write_report_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");

        write_report(&path, "<html>first</html>").unwrap();
        write_report(&path, "<html>second</html>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<html>second</html>");
        assert!(!temp_sibling(&path).exists());
    }

    #[test]
    fn test_failed_write_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory in the way makes the final rename fail.
        let path = dir.path().join("report.html");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(write_report(&path, "<html></html>").is_err());
        assert!(!temp_sibling(&path).exists());
        assert!(path.join("keep").exists());
    }
}
