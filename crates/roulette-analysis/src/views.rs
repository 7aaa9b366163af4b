//! The six report views.
//!
//! Each view is a pure function over the loaded records (distributions) or
//! the aggregated bins (trends).

use crate::aggregate::{Aggregated, Bin};
use crate::chart::{
    Bar, BarChart, Chart, ChartBody, ChartId, LineChart, Marker, MarkerAnchor, PieChart, PieSlice,
    Rgb,
};
use crate::error::{AnalysisError, AnalysisResult};
use crate::stats::{quantile_from_counts, value_counts};
use roulette_core::{BetRecord, Outcome, MAX_ROLL};
use std::collections::BTreeMap;
use tracing::debug;

/// Losing-streak length distribution with its tail percentiles.
#[derive(Debug, Clone, PartialEq)]
pub struct LosingStreakStats {
    /// Streak length -> number of records ending a losing streak of that length.
    pub counts: BTreeMap<u64, u64>,
    pub p95: Option<f64>,
    pub p99: Option<f64>,
}

impl LosingStreakStats {
    pub fn from_records(records: &[BetRecord]) -> AnalysisResult<Self> {
        let counts = value_counts(records.iter().filter_map(BetRecord::losing_streak_len));
        Ok(Self {
            p95: quantile_from_counts(&counts, 0.95)?,
            p99: quantile_from_counts(&counts, 0.99)?,
            counts,
        })
    }
}

fn outcome_color(outcome: Outcome) -> Rgb {
    match outcome {
        Outcome::Win => Rgb::GREEN,
        Outcome::Lose => Rgb::RED,
        Outcome::Push => Rgb::BLUE,
    }
}

fn trend_chart(
    id: ChartId,
    title: &str,
    y_label: &str,
    bins: &[Bin],
    y: impl Fn(&Bin) -> f64,
    baseline: Option<f64>,
) -> Chart {
    Chart {
        id,
        title: title.to_string(),
        x_label: "Bet Count".to_string(),
        y_label: y_label.to_string(),
        body: ChartBody::Line(LineChart {
            points: bins.iter().map(|b| (b.bet_count, y(b))).collect(),
            color: Rgb::STEEL_BLUE,
            baseline,
        }),
    }
}

/// 1. Balance over time from the aggregated bins.
pub fn balance_trend(aggregated: &Aggregated) -> Chart {
    trend_chart(
        ChartId::BalanceTrend,
        "Balance Over Time (Aggregated)",
        "Balance",
        &aggregated.bins,
        |b| b.balance,
        None,
    )
}

/// 2. Outcome shares, largest first.
pub fn outcome_distribution(records: &[BetRecord]) -> Chart {
    let counts = value_counts(records.iter().map(|r| r.outcome));

    let mut slices: Vec<PieSlice> = counts
        .into_iter()
        .map(|(outcome, value)| PieSlice {
            label: outcome.to_string(),
            value,
            color: outcome_color(outcome),
        })
        .collect();
    // stable: ties keep win/lose/push order
    slices.sort_by(|a, b| b.value.cmp(&a.value));

    Chart {
        id: ChartId::OutcomeDistribution,
        title: "Distribution of Outcomes".to_string(),
        x_label: String::new(),
        y_label: String::new(),
        body: ChartBody::Pie(PieChart { slices }),
    }
}

/// 3. Losing-streak lengths with 95th/99th percentile markers.
pub fn losing_streaks(stats: &LosingStreakStats) -> Chart {
    let bars = stats
        .counts
        .iter()
        .map(|(&length, &count)| Bar {
            x: length as i64,
            count,
            color: Rgb::ORANGE,
        })
        .collect();

    let mut markers = Vec::with_capacity(2);
    if let Some(p95) = stats.p95 {
        markers.push(Marker {
            x: p95,
            label: format!("95th Percentile ({p95:.0})"),
            color: Rgb::TEAL,
            anchor: MarkerAnchor::TopLeft,
        });
    }
    if let Some(p99) = stats.p99 {
        markers.push(Marker {
            x: p99,
            label: format!("99th Percentile ({p99:.0})"),
            color: Rgb::PURPLE,
            anchor: MarkerAnchor::TopRight,
        });
    }

    Chart {
        id: ChartId::LosingStreaks,
        title: "Distribution of Losing Streak Lengths (with Percentiles)".to_string(),
        x_label: "Length of Losing Streak".to_string(),
        y_label: "Frequency (Count)".to_string(),
        body: ChartBody::Bar(BarChart {
            bars,
            show_values: true,
            x_range: None,
            markers,
        }),
    }
}

/// 4. Roll results over the fixed 0-36 axis.
pub fn roll_distribution(records: &[BetRecord]) -> Chart {
    let bars = value_counts(records.iter().map(|r| r.roll))
        .into_iter()
        .map(|(roll, count)| Bar {
            x: i64::from(roll),
            count,
            color: Rgb::STEEL_BLUE,
        })
        .collect();

    Chart {
        id: ChartId::RollDistribution,
        title: format!("Distribution of Roll Results (0-{MAX_ROLL})"),
        x_label: "Roll".to_string(),
        y_label: "Count".to_string(),
        body: ChartBody::Bar(BarChart {
            bars,
            show_values: false,
            x_range: Some((-0.5, f64::from(MAX_ROLL) + 0.5)),
            markers: Vec::new(),
        }),
    }
}

/// 5. Signed streak over time from the aggregated bins, with a zero line.
pub fn streak_progression(aggregated: &Aggregated) -> Chart {
    trend_chart(
        ChartId::StreakProgression,
        "Win/Loss Streak Progression (Aggregated)",
        "Streak Length",
        &aggregated.bins,
        |b| b.current_streak,
        Some(0.0),
    )
}

/// 6. Every signed streak value; winning streaks green, the rest red.
pub fn all_streaks(records: &[BetRecord]) -> Chart {
    let bars = value_counts(records.iter().map(|r| r.current_streak))
        .into_iter()
        .map(|(streak, count)| Bar {
            x: streak,
            count,
            color: if streak > 0 { Rgb::GREEN } else { Rgb::RED },
        })
        .collect();

    Chart {
        id: ChartId::AllStreaks,
        title: "Frequency of All Streak Lengths".to_string(),
        x_label: "Streak Length".to_string(),
        y_label: "Frequency (Count)".to_string(),
        body: ChartBody::Bar(BarChart {
            bars,
            show_values: true,
            x_range: None,
            markers: Vec::new(),
        }),
    }
}

/// Build all six charts in report order.
///
/// Fails with `EmptyDataset` when there are no records.
pub fn build_charts(records: &[BetRecord], aggregated: &Aggregated) -> AnalysisResult<Vec<Chart>> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let streak_stats = LosingStreakStats::from_records(records)?;
    debug!(
        losing_lengths = streak_stats.counts.len(),
        p95 = ?streak_stats.p95,
        p99 = ?streak_stats.p99,
        "Losing streak percentiles"
    );

    Ok(vec![
        balance_trend(aggregated),
        outcome_distribution(records),
        losing_streaks(&streak_stats),
        roll_distribution(records),
        streak_progression(aggregated),
        all_streaks(records),
    ])
}
