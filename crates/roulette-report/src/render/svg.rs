//! Static image renderer.
//!
//! Draws charts with `plotters` into an in-memory SVG document and embeds it
//! as a base64 data URI, so the report stays a single file and needs no
//! system fonts or headless browser.

use super::{escape_html, si_format, ChartRenderer};
use crate::error::{ReportError, ReportResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use roulette_analysis::{BarChart, Chart, ChartBody, LineChart, MarkerAnchor, PieChart, Rgb};
use tracing::debug;

type SvgArea<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const DASH_SEGMENTS: usize = 40;

/// Static SVG renderer.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    width: u32,
    height: u32,
}

impl SvgRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Draw the chart as a standalone SVG document.
    pub fn draw_svg(&self, chart: &Chart) -> ReportResult<String> {
        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(|e| render_error(chart, e))?;

            match &chart.body {
                ChartBody::Line(line) => draw_line(&root, chart, line)?,
                ChartBody::Pie(pie) => draw_pie(&root, chart, pie)?,
                ChartBody::Bar(bar) => draw_bars(&root, chart, bar)?,
            }

            root.present().map_err(|e| render_error(chart, e))?;
        }
        debug!(chart = %chart.id, bytes = buffer.len(), "Rendered static chart");
        Ok(buffer)
    }
}

impl ChartRenderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn render(&self, chart: &Chart) -> ReportResult<String> {
        let svg = self.draw_svg(chart)?;
        Ok(format!(
            "<img src=\"data:image/svg+xml;base64,{}\" alt=\"{}\" style=\"width: 100%; height: auto;\">",
            STANDARD.encode(svg.as_bytes()),
            escape_html(&chart.title),
        ))
    }
}

fn render_error(chart: &Chart, err: impl std::fmt::Display) -> ReportError {
    ReportError::Render {
        chart: chart.id.slug().to_string(),
        message: err.to_string(),
    }
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Min/max of `values`, widened so the range is never empty.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

/// Dashed segment between two data points, as alternating path pieces.
fn dashed(from: (f64, f64), to: (f64, f64), style: ShapeStyle) -> Vec<PathElement<(f64, f64)>> {
    let step = |i: usize| {
        let t = i as f64 / DASH_SEGMENTS as f64;
        (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
    };
    (0..DASH_SEGMENTS)
        .step_by(2)
        .map(|i| PathElement::new(vec![step(i), step(i + 1)], style))
        .collect()
}

fn draw_line(root: &SvgArea<'_>, chart: &Chart, line: &LineChart) -> ReportResult<()> {
    let (x_min, x_max) = bounds(line.points.iter().map(|p| p.0));
    let (y_min, y_max) = bounds(line.points.iter().map(|p| p.1).chain(line.baseline));

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, (FONT, 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| render_error(chart, e))?;

    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()
        .map_err(|e| render_error(chart, e))?;

    ctx.draw_series(LineSeries::new(
        line.points.iter().copied(),
        rgb(line.color).stroke_width(2),
    ))
    .map_err(|e| render_error(chart, e))?;

    if let Some(y) = line.baseline {
        ctx.draw_series(dashed(
            (x_min, y),
            (x_max, y),
            rgb(Rgb::GREY).stroke_width(1),
        ))
        .map_err(|e| render_error(chart, e))?;
    }

    Ok(())
}

fn draw_bars(root: &SvgArea<'_>, chart: &Chart, bar: &BarChart) -> ReportResult<()> {
    let (x_lo, x_hi) = bar.x_range.unwrap_or_else(|| {
        let (lo, hi) = bounds(
            bar.bars
                .iter()
                .map(|b| b.x as f64)
                .chain(bar.markers.iter().map(|m| m.x)),
        );
        (lo - 0.5, hi + 0.5)
    });
    let y_max = bar
        .bars
        .iter()
        .map(|b| b.count)
        .max()
        .map_or(1.0, |max| max.max(1) as f64 * 1.15);

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, (FONT, 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_max)
        .map_err(|e| render_error(chart, e))?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()
        .map_err(|e| render_error(chart, e))?;

    ctx.draw_series(bar.bars.iter().map(|b| {
        let x = b.x as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, b.count as f64)], rgb(b.color).filled())
    }))
    .map_err(|e| render_error(chart, e))?;

    if bar.show_values {
        let style = (FONT, 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        ctx.draw_series(bar.bars.iter().map(|b| {
            Text::new(si_format(b.count), (b.x as f64, b.count as f64), style.clone())
        }))
        .map_err(|e| render_error(chart, e))?;
    }

    for marker in &bar.markers {
        let color = rgb(marker.color);
        ctx.draw_series(dashed(
            (marker.x, 0.0),
            (marker.x, y_max),
            color.stroke_width(2),
        ))
        .map_err(|e| render_error(chart, e))?;

        let h_pos = match marker.anchor {
            MarkerAnchor::TopLeft => HPos::Right,
            MarkerAnchor::TopRight => HPos::Left,
        };
        let style = (FONT, 14)
            .into_font()
            .color(&color)
            .pos(Pos::new(h_pos, VPos::Top));
        ctx.draw_series(std::iter::once(Text::new(
            marker.label.clone(),
            (marker.x, y_max),
            style,
        )))
        .map_err(|e| render_error(chart, e))?;
    }

    Ok(())
}

fn draw_pie(root: &SvgArea<'_>, chart: &Chart, pie: &PieChart) -> ReportResult<()> {
    let area = root
        .titled(&chart.title, (FONT, 24).into_font())
        .map_err(|e| render_error(chart, e))?;

    let total = pie.total();
    if total == 0 {
        return Ok(());
    }

    let (width, height) = area.dim_in_pixel();
    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = f64::from(width.min(height)) * 0.35;
    let sizes: Vec<f64> = pie.slices.iter().map(|s| s.value as f64).collect();
    let colors: Vec<RGBColor> = pie.slices.iter().map(|s| rgb(s.color)).collect();
    let labels: Vec<String> = pie
        .slices
        .iter()
        .map(|s| format!("{} ({:.1}%)", s.label, s.value as f64 * 100.0 / total as f64))
        .collect();

    let element = Pie::new(&center, &radius, &sizes, &colors, &labels);
    area.draw(&element).map_err(|e| render_error(chart, e))?;
    Ok(())
}
