//! Chart renderers.
//!
//! A renderer turns one backend-neutral `Chart` into an HTML fragment that
//! can be dropped into a chart container. Swapping charting libraries means
//! adding an implementation here; views and aggregation are untouched.

mod plotly;
mod svg;

pub use plotly::PlotlyRenderer;
pub use svg::SvgRenderer;

use crate::error::ReportResult;
use roulette_analysis::Chart;

/// Converts a chart into an HTML fragment.
pub trait ChartRenderer {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    fn render(&self, chart: &Chart) -> ReportResult<String>;
}

/// Compact SI formatting for bar labels, matching Plotly's `.2s`
/// (`999` -> `1.0k`, `12_345` -> `12k`, `5` -> `5.0`).
///
/// The value is rounded to two significant digits before the prefix is
/// chosen, so rounding can carry into the next prefix.
pub(crate) fn si_format(value: u64) -> String {
    const UNITS: [(u128, &str); 5] = [
        (1_000_000_000_000, "T"),
        (1_000_000_000, "G"),
        (1_000_000, "M"),
        (1_000, "k"),
        (1, ""),
    ];
    let value = u128::from(value);
    let digits = value.checked_ilog10().unwrap_or(0) + 1;
    let rounded = if digits > 2 {
        let step = 10u128.pow(digits - 2);
        (value + step / 2) / step * step
    } else {
        value
    };

    let (scale, suffix) = UNITS
        .into_iter()
        .find(|&(scale, _)| rounded >= scale)
        .unwrap_or((1, ""));
    let scaled = rounded as f64 / scale as f64;
    if scaled >= 10.0 {
        format!("{scaled:.0}{suffix}")
    } else {
        format!("{scaled:.1}{suffix}")
    }
}

/// Minimal HTML escaping for text and attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_si_format() {
        assert_eq!(si_format(1_500), "1.5k");
        assert_eq!(si_format(12_000), "12k");
        assert_eq!(si_format(2_340_000), "2.3M");
        assert_eq!(si_format(150), "150");
        assert_eq!(si_format(5), "5.0");
        assert_eq!(si_format(0), "0.0");
    }

    #[test]
    fn test_si_format_rounds_before_prefix() {
        assert_eq!(si_format(999), "1.0k");
        assert_eq!(si_format(1_234), "1.2k");
        assert_eq!(si_format(12_345), "12k");
        assert_eq!(si_format(99_950), "100k");
        assert_eq!(si_format(999_950), "1.0M");
        assert_eq!(si_format(999_999_999), "1.0G");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
