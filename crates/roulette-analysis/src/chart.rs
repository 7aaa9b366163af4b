//! Backend-neutral chart descriptions.
//!
//! Views produce these; renderers in `roulette-report` turn them into
//! Plotly markup or static images. Nothing here knows about HTML.

use std::fmt;

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const ORANGE: Rgb = Rgb(255, 165, 0);
    pub const TEAL: Rgb = Rgb(0, 128, 128);
    pub const PURPLE: Rgb = Rgb(128, 0, 128);
    pub const GREY: Rgb = Rgb(128, 128, 128);
    pub const STEEL_BLUE: Rgb = Rgb(70, 130, 180);

    /// `#rrggbb` form for CSS and Plotly.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The six report charts, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartId {
    BalanceTrend,
    OutcomeDistribution,
    LosingStreaks,
    RollDistribution,
    StreakProgression,
    AllStreaks,
}

impl ChartId {
    pub const ALL: [ChartId; 6] = [
        ChartId::BalanceTrend,
        ChartId::OutcomeDistribution,
        ChartId::LosingStreaks,
        ChartId::RollDistribution,
        ChartId::StreakProgression,
        ChartId::AllStreaks,
    ];

    /// Stable identifier usable as an HTML id.
    pub fn slug(&self) -> &'static str {
        match self {
            ChartId::BalanceTrend => "balance-trend",
            ChartId::OutcomeDistribution => "outcome-distribution",
            ChartId::LosingStreaks => "losing-streaks",
            ChartId::RollDistribution => "roll-distribution",
            ChartId::StreakProgression => "streak-progression",
            ChartId::AllStreaks => "all-streaks",
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Line over `(x, y)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub points: Vec<(f64, f64)>,
    pub color: Rgb,
    /// Dashed horizontal reference line at this y.
    pub baseline: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: i64,
    pub count: u64,
    pub color: Rgb,
}

/// Where a marker's annotation sits relative to its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerAnchor {
    TopLeft,
    TopRight,
}

/// Dashed vertical reference line with a label.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub label: String,
    pub color: Rgb,
    pub anchor: MarkerAnchor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub bars: Vec<Bar>,
    /// Print each bar's count above it.
    pub show_values: bool,
    /// Fixed x-axis range; derived from the data when `None`.
    pub x_range: Option<(f64, f64)>,
    pub markers: Vec<Marker>,
}

impl BarChart {
    pub fn total(&self) -> u64 {
        self.bars.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Line(LineChart),
    Pie(PieChart),
    Bar(BarChart),
}

/// A complete chart ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub id: ChartId,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: ChartBody,
}

impl Chart {
    /// Trend charts are built from aggregated bins.
    pub fn is_trend(&self) -> bool {
        matches!(self.body, ChartBody::Line(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(Rgb::GREEN.to_hex(), "#008000");
        assert_eq!(Rgb::ORANGE.to_hex(), "#ffa500");
    }

    #[test]
    fn test_slugs_unique() {
        let mut slugs: Vec<_> = ChartId::ALL.iter().map(|id| id.slug()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), 6);
    }
}
