//! Bet log records.

use crate::decimal::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result category of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Push,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
            Outcome::Push => "push",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the bet log, restricted to the columns the analysis reads.
///
/// Extra columns in the log (nonce, color, payout, ...) are ignored when
/// deserializing by header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRecord {
    /// Sequential bet index, monotonic from 1.
    pub bet_count: u64,
    /// Account balance after the bet settled.
    pub balance: Amount,
    /// Signed streak: positive = consecutive wins, negative = consecutive losses.
    pub current_streak: i64,
    pub outcome: Outcome,
    /// Pocket number, 0-36.
    pub roll: u8,
}

impl BetRecord {
    #[inline]
    pub fn is_losing_streak(&self) -> bool {
        self.current_streak < 0
    }

    /// Length of the losing streak ending at this bet, if any.
    #[inline]
    pub fn losing_streak_len(&self) -> Option<u64> {
        self.is_losing_streak()
            .then(|| self.current_streak.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_outcome_serde_lowercase() {
        let json = serde_json::to_string(&Outcome::Push).unwrap();
        assert_eq!(json, "\"push\"");
        let back: Outcome = serde_json::from_str("\"lose\"").unwrap();
        assert_eq!(back, Outcome::Lose);
    }

    #[test]
    fn test_losing_streak_len() {
        let mut record = BetRecord {
            bet_count: 1,
            balance: Amount::new(dec!(100)),
            current_streak: -4,
            outcome: Outcome::Lose,
            roll: 2,
        };
        assert_eq!(record.losing_streak_len(), Some(4));

        record.current_streak = 3;
        assert_eq!(record.losing_streak_len(), None);

        record.current_streak = 0;
        assert_eq!(record.losing_streak_len(), None);
    }

    #[test]
    fn test_camel_case_field_names() {
        let record = BetRecord {
            bet_count: 7,
            balance: Amount::new(dec!(99.5)),
            current_streak: -1,
            outcome: Outcome::Lose,
            roll: 0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["betCount"], 7);
        assert_eq!(json["currentStreak"], -1);
        assert_eq!(json["balance"], "99.5");
    }
}
