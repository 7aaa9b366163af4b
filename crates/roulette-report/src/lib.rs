//! Chart rendering and HTML report output.
//!
//! - `ChartRenderer`: backend seam, with Plotly (interactive) and SVG (static) implementations
//! - `HtmlReport`: assembles rendered charts into one self-contained document
//! - `write_report`: atomic write of the finished document

pub mod config;
pub mod error;
pub mod html;
pub mod render;

pub use config::{ChartMode, RenderMode, ReportConfig};
pub use error::{ReportError, ReportResult};
pub use html::{write_report, HtmlReport, RenderedChart};
pub use render::{ChartRenderer, PlotlyRenderer, SvgRenderer};
