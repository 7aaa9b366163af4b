//! Binned aggregation for trend charts.
//!
//! Plotting millions of points is slow and adds nothing visually, so logs
//! larger than the bin target are grouped into equal-width `betCount`
//! ranges and each range is replaced by the mean of its numeric columns.

use crate::error::{AnalysisError, AnalysisResult};
use roulette_core::BetRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Number of points rendered for trend charts on large logs.
pub const DEFAULT_BIN_TARGET: usize = 50_000;

/// One trend point: either a raw record or the mean over a bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub bet_count: f64,
    pub balance: f64,
    pub current_streak: f64,
}

impl From<&BetRecord> for Bin {
    fn from(record: &BetRecord) -> Self {
        Self {
            bet_count: record.bet_count as f64,
            balance: record.balance.to_f64(),
            current_streak: record.current_streak as f64,
        }
    }
}

/// Aggregator output.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregated {
    pub bins: Vec<Bin>,
    /// False when the input was small enough to pass through unchanged.
    pub binned: bool,
}

#[derive(Default)]
struct BinAccumulator {
    count: u64,
    bet_count_sum: u128,
    balance_sum: Decimal,
    streak_sum: i128,
}

impl BinAccumulator {
    fn push(&mut self, record: &BetRecord) {
        self.count += 1;
        self.bet_count_sum += u128::from(record.bet_count);
        self.balance_sum += record.balance.inner();
        self.streak_sum += i128::from(record.current_streak);
    }

    fn mean(&self) -> Option<Bin> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let balance = (self.balance_sum / Decimal::from(self.count))
            .to_f64()
            .unwrap_or(0.0);
        Some(Bin {
            bet_count: self.bet_count_sum as f64 / n,
            balance,
            current_streak: self.streak_sum as f64 / n,
        })
    }
}

/// Equal-width binning over `betCount`.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    bin_target: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            bin_target: DEFAULT_BIN_TARGET,
        }
    }
}

impl Aggregator {
    pub fn new(bin_target: usize) -> AnalysisResult<Self> {
        if bin_target == 0 {
            return Err(AnalysisError::InvalidBinTarget);
        }
        Ok(Self { bin_target })
    }

    pub fn bin_target(&self) -> usize {
        self.bin_target
    }

    /// Downsample `records` to at most `bin_target` points.
    ///
    /// Inputs at or below the target pass through one point per record.
    /// Empty bins are dropped, so a binned result can be shorter than the
    /// target. Output is ordered by bin.
    pub fn aggregate(&self, records: &[BetRecord]) -> Aggregated {
        if records.len() <= self.bin_target {
            debug!(rows = records.len(), "No aggregation needed");
            return Aggregated {
                bins: records.iter().map(Bin::from).collect(),
                binned: false,
            };
        }

        info!(
            rows = records.len(),
            bins = self.bin_target,
            "Dataset is large, aggregating trend data into bins"
        );

        let (min, max) = records
            .iter()
            .fold((u64::MAX, u64::MIN), |(lo, hi), r| {
                (lo.min(r.bet_count), hi.max(r.bet_count))
            });

        let mut accumulators: Vec<BinAccumulator> = (0..self.bin_target)
            .map(|_| BinAccumulator::default())
            .collect();
        for record in records {
            accumulators[self.bin_index(record.bet_count, min, max)].push(record);
        }

        let bins: Vec<Bin> = accumulators.iter().filter_map(BinAccumulator::mean).collect();
        debug!(non_empty = bins.len(), "Aggregation complete");

        Aggregated { bins, binned: true }
    }

    /// Bin for `value` over `[min, max]` split into right-closed intervals.
    ///
    /// The first interval also holds `min` itself.
    fn bin_index(&self, value: u64, min: u64, max: u64) -> usize {
        let span = max - min;
        if span == 0 {
            return 0;
        }
        let position = (value - min) as f64 * self.bin_target as f64 / span as f64;
        let index = (position.ceil() as usize).saturating_sub(1);
        index.min(self.bin_target - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roulette_core::{Amount, Outcome};
    use rust_decimal_macros::dec;

    fn record(bet_count: u64, balance: Decimal, streak: i64) -> BetRecord {
        BetRecord {
            bet_count,
            balance: Amount::new(balance),
            current_streak: streak,
            outcome: if streak > 0 { Outcome::Win } else { Outcome::Lose },
            roll: (bet_count % 37) as u8,
        }
    }

    fn sequential(n: u64) -> Vec<BetRecord> {
        (1..=n)
            .map(|i| record(i, Decimal::from(1000 + i), if i % 3 == 0 { -2 } else { 1 }))
            .collect()
    }

    #[test]
    fn test_zero_bin_target_rejected() {
        assert!(matches!(
            Aggregator::new(0),
            Err(AnalysisError::InvalidBinTarget)
        ));
    }

    #[test]
    fn test_small_input_passes_through() {
        let records = sequential(10);
        let result = Aggregator::new(10).unwrap().aggregate(&records);

        assert!(!result.binned);
        let expected: Vec<Bin> = records.iter().map(Bin::from).collect();
        assert_eq!(result.bins, expected);
    }

    #[test]
    fn test_default_target_passes_through_at_limit() {
        let records = sequential(DEFAULT_BIN_TARGET as u64);
        let result = Aggregator::default().aggregate(&records);
        assert!(!result.binned);
        assert_eq!(result.bins.len(), DEFAULT_BIN_TARGET);
    }

    #[test]
    fn test_default_target_bins_above_limit() {
        let records = sequential(DEFAULT_BIN_TARGET as u64 + 1);
        let result = Aggregator::default().aggregate(&records);
        assert!(result.binned);
        assert_eq!(result.bins.len(), DEFAULT_BIN_TARGET);
        // first bin holds bets 1 and 2
        assert_eq!(result.bins[0].bet_count, 1.5);
        assert_eq!(result.bins.last().unwrap().bet_count, 50_001.0);
    }

    #[test]
    fn test_bins_are_means_of_slices() {
        let records = vec![
            record(1, dec!(100), 1),
            record(2, dec!(101), 2),
            record(3, dec!(99), -1),
            record(4, dec!(98), -2),
            record(5, dec!(97.5), -3),
            record(6, dec!(99.5), 1),
            record(7, dec!(101.5), 2),
            record(8, dec!(100.5), -1),
            record(9, dec!(102), 1),
            record(10, dec!(104), 2),
        ];
        let result = Aggregator::new(5).unwrap().aggregate(&records);

        assert!(result.binned);
        assert_eq!(result.bins.len(), 5);
        for (i, bin) in result.bins.iter().enumerate() {
            let slice = &records[i * 2..i * 2 + 2];
            let mean_bc = slice.iter().map(|r| r.bet_count as f64).sum::<f64>() / 2.0;
            let mean_bal = slice.iter().map(|r| r.balance.to_f64()).sum::<f64>() / 2.0;
            let mean_streak = slice.iter().map(|r| r.current_streak as f64).sum::<f64>() / 2.0;
            assert_eq!(bin.bet_count, mean_bc, "bin {i}");
            assert!((bin.balance - mean_bal).abs() < 1e-9, "bin {i}");
            assert_eq!(bin.current_streak, mean_streak, "bin {i}");
        }
        assert_eq!(result.bins[2].balance, 98.5);
    }

    #[test]
    fn test_empty_bins_dropped() {
        // two clusters far apart: most bins between them are empty
        let mut records: Vec<BetRecord> = (1..=3).map(|i| record(i, dec!(10), 1)).collect();
        records.extend((998..=1000).map(|i| record(i, dec!(20), -1)));

        let result = Aggregator::new(4).unwrap().aggregate(&records);
        assert!(result.binned);
        assert_eq!(result.bins.len(), 2);
        assert_eq!(result.bins[0].bet_count, 2.0);
        assert_eq!(result.bins[0].balance, 10.0);
        assert_eq!(result.bins[1].bet_count, 999.0);
        assert_eq!(result.bins[1].current_streak, -1.0);
    }

    #[test]
    fn test_constant_bet_count_single_bin() {
        let records: Vec<BetRecord> = (0..5).map(|_| record(7, dec!(3), 1)).collect();
        let result = Aggregator::new(2).unwrap().aggregate(&records);
        assert_eq!(result.bins.len(), 1);
        assert_eq!(result.bins[0].bet_count, 7.0);
    }

    #[test]
    fn test_unsorted_input_binned_by_value() {
        let mut records = sequential(10);
        records.reverse();
        let result = Aggregator::new(5).unwrap().aggregate(&records);
        let counts: Vec<f64> = result.bins.iter().map(|b| b.bet_count).collect();
        assert_eq!(counts, vec![1.5, 3.5, 5.5, 7.5, 9.5]);
    }
}
