//! Interactive Plotly renderer.
//!
//! Emits a target `<div>` and a `<script>` calling `Plotly.newPlot` with a
//! figure built as JSON. The Plotly bundle itself is loaded once by the
//! report header.

use super::{escape_html, ChartRenderer};
use crate::error::ReportResult;
use roulette_analysis::{BarChart, Chart, ChartBody, LineChart, MarkerAnchor, PieChart};
use serde_json::{json, Value};

/// Plotly figure renderer.
#[derive(Debug, Clone)]
pub struct PlotlyRenderer {
    height: u32,
}

impl PlotlyRenderer {
    pub fn new(height: u32) -> Self {
        Self { height }
    }

    /// Build the `(data, layout)` pair for a chart.
    pub fn figure(&self, chart: &Chart) -> (Value, Value) {
        let mut layout = json!({
            "title": { "text": chart.title, "x": 0.5 },
            "xaxis": { "title": { "text": chart.x_label } },
            "yaxis": { "title": { "text": chart.y_label } },
            "height": self.height,
        });

        let data = match &chart.body {
            ChartBody::Line(line) => line_traces(line, &mut layout),
            ChartBody::Pie(pie) => pie_traces(pie),
            ChartBody::Bar(bar) => bar_traces(bar, &mut layout),
        };

        (data, layout)
    }
}

fn dashed_hline(y: f64, color: &str) -> Value {
    json!({
        "type": "line",
        "xref": "paper",
        "x0": 0,
        "x1": 1,
        "y0": y,
        "y1": y,
        "line": { "color": color, "dash": "dash" },
    })
}

fn line_traces(line: &LineChart, layout: &mut Value) -> Value {
    let (xs, ys): (Vec<f64>, Vec<f64>) = line.points.iter().copied().unzip();
    if let Some(y) = line.baseline {
        layout["shapes"] = json!([dashed_hline(y, "grey")]);
    }
    json!([{
        "type": "scatter",
        "mode": "lines",
        "x": xs,
        "y": ys,
        "line": { "color": line.color.to_hex() },
    }])
}

fn pie_traces(pie: &PieChart) -> Value {
    let labels: Vec<&str> = pie.slices.iter().map(|s| s.label.as_str()).collect();
    let values: Vec<u64> = pie.slices.iter().map(|s| s.value).collect();
    let colors: Vec<String> = pie.slices.iter().map(|s| s.color.to_hex()).collect();
    json!([{
        "type": "pie",
        "labels": labels,
        "values": values,
        "marker": { "colors": colors },
        "sort": false,
    }])
}

fn bar_traces(bar: &BarChart, layout: &mut Value) -> Value {
    let xs: Vec<i64> = bar.bars.iter().map(|b| b.x).collect();
    let ys: Vec<u64> = bar.bars.iter().map(|b| b.count).collect();
    let colors: Vec<String> = bar.bars.iter().map(|b| b.color.to_hex()).collect();

    let mut trace = json!({
        "type": "bar",
        "x": xs,
        "y": ys,
        "marker": { "color": colors },
    });
    if bar.show_values {
        trace["text"] = json!(ys);
        trace["texttemplate"] = json!("%{text:.2s}");
        trace["textposition"] = json!("outside");
        layout["uniformtext"] = json!({ "minsize": 8, "mode": "hide" });
    }

    layout["bargap"] = json!(0.2);
    if let Some((lo, hi)) = bar.x_range {
        layout["xaxis"]["range"] = json!([lo, hi]);
    }

    if !bar.markers.is_empty() {
        let shapes: Vec<Value> = bar
            .markers
            .iter()
            .map(|m| {
                json!({
                    "type": "line",
                    "yref": "paper",
                    "x0": m.x,
                    "x1": m.x,
                    "y0": 0,
                    "y1": 1,
                    "line": { "color": m.color.to_hex(), "width": 2, "dash": "dash" },
                })
            })
            .collect();
        let annotations: Vec<Value> = bar
            .markers
            .iter()
            .map(|m| {
                let xanchor = match m.anchor {
                    MarkerAnchor::TopLeft => "right",
                    MarkerAnchor::TopRight => "left",
                };
                json!({
                    "x": m.x,
                    "y": 1,
                    "yref": "paper",
                    "text": m.label,
                    "showarrow": false,
                    "xanchor": xanchor,
                    "yanchor": "bottom",
                })
            })
            .collect();
        layout["shapes"] = json!(shapes);
        layout["annotations"] = json!(annotations);
    }

    json!([trace])
}

/// Serialize for embedding inside `<script>`; `</` would end the element early.
fn script_json(value: &Value) -> ReportResult<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

impl ChartRenderer for PlotlyRenderer {
    fn name(&self) -> &'static str {
        "plotly"
    }

    fn render(&self, chart: &Chart) -> ReportResult<String> {
        let (data, layout) = self.figure(chart);
        let div_id = format!("chart-{}", chart.id.slug());
        Ok(format!(
            "<div id=\"{id}\" class=\"plotly-chart\" aria-label=\"{label}\"></div>\n\
             <script>Plotly.newPlot(\"{id}\", {data}, {layout}, {{\"responsive\": true}});</script>",
            id = div_id,
            label = escape_html(&chart.title),
            data = script_json(&data)?,
            layout = script_json(&layout)?,
        ))
    }
}
