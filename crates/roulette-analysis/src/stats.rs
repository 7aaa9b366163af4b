//! Frequency counts and quantiles.

use crate::error::{AnalysisError, AnalysisResult};
use std::collections::BTreeMap;

/// Count occurrences of each value, keyed in ascending order.
pub fn value_counts<K: Ord>(values: impl IntoIterator<Item = K>) -> BTreeMap<K, u64> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Linear-interpolation quantile over a frequency table.
///
/// Equivalent to sorting the expanded sample `v` (length `n`) and returning
/// `v[lo] + (h - lo) * (v[lo + 1] - v[lo])` with `h = (n - 1) * q`,
/// `lo = floor(h)`. Walking the cumulative counts avoids materializing
/// millions of samples. Returns `None` for an empty table.
pub fn quantile_from_counts(counts: &BTreeMap<u64, u64>, q: f64) -> AnalysisResult<Option<f64>> {
    if !(0.0..=1.0).contains(&q) {
        return Err(AnalysisError::InvalidQuantile(q));
    }

    let n: u64 = counts.values().sum();
    if n == 0 {
        return Ok(None);
    }

    let h = (n - 1) as f64 * q;
    let lo_rank = h.floor() as u64;
    let hi_rank = (lo_rank + 1).min(n - 1);
    let fraction = h - lo_rank as f64;

    let lo = value_at_rank(counts, lo_rank);
    let hi = value_at_rank(counts, hi_rank);
    match (lo, hi) {
        (Some(lo), Some(hi)) => Ok(Some(lo + fraction * (hi - lo))),
        _ => Ok(None),
    }
}

/// Value at 0-based `rank` in the sorted expansion of `counts`.
fn value_at_rank(counts: &BTreeMap<u64, u64>, rank: u64) -> Option<f64> {
    let mut seen = 0u64;
    for (&value, &count) in counts {
        seen += count;
        if rank < seen {
            return Some(value as f64);
        }
    }
    None
}
