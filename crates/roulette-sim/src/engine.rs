//! Martingale betting engine.
//!
//! Plays red-odd against the provably-fair wheel: red+odd doubles the
//! stake, red+even and black+odd return it, anything else loses it. Stakes
//! reset to the base bet on a win and multiply on a loss; a push leaves
//! everything unchanged. The run stops early once the next stake exceeds
//! the balance.

use crate::config::SimConfig;
use crate::error::SimResult;
use crate::fairness::{Seeds, SpinGenerator};
use roulette_core::{Amount, Color, Outcome, Parity, Pocket};
use roulette_persistence::{CsvLogWriter, LogRow};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Settle a red-odd bet: `(outcome, payout multiplier)`.
pub fn settle(pocket: &Pocket) -> (Outcome, u8) {
    match (pocket.color, pocket.parity) {
        (Color::Red, Parity::Odd) => (Outcome::Win, 2),
        (Color::Red, Parity::Even) | (Color::Black, Parity::Odd) => (Outcome::Push, 1),
        _ => (Outcome::Lose, 0),
    }
}

/// Running bankroll and stake state.
#[derive(Debug, Clone, PartialEq)]
pub struct BetState {
    pub start_balance: Amount,
    pub balance: Amount,
    pub profit: Amount,
    pub next_bet: Amount,
    pub streak: i64,
    pub wagered: Amount,
    pub wins: u64,
}

impl BetState {
    pub fn new(start_balance: Amount, base_bet: Amount) -> Self {
        Self {
            start_balance,
            balance: start_balance,
            profit: Amount::ZERO,
            next_bet: base_bet,
            streak: 0,
            wagered: Amount::ZERO,
            wins: 0,
        }
    }

    /// Apply one settled round; returns the round profit.
    pub fn apply(&mut self, outcome: Outcome, payout: u8, config: &SimConfig) -> Amount {
        let stake = self.next_bet;
        self.wagered += stake;

        let round_profit = match outcome {
            Outcome::Win => {
                let gain = stake * rust_decimal::Decimal::from(payout) - stake;
                self.wins += 1;
                self.streak = if self.streak >= 0 { self.streak + 1 } else { 1 };
                self.next_bet = Amount::new(config.base_bet);
                gain
            }
            Outcome::Push => Amount::ZERO,
            Outcome::Lose => {
                self.streak = if self.streak <= 0 { self.streak - 1 } else { -1 };
                self.next_bet = stake * config.increase_on_loss;
                -stake
            }
        };

        self.profit += round_profit;
        self.balance = self.start_balance + self.profit;
        round_profit
    }

    pub fn is_busted(&self) -> bool {
        self.next_bet > self.balance
    }
}

/// End-of-run statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SimSummary {
    /// Rounds played, including a busting round.
    pub bets: u64,
    pub rows_logged: u64,
    pub final_balance: Amount,
    pub profit: Amount,
    pub wagered: Amount,
    pub wins: u64,
    /// Most negative streak seen.
    pub worst_streak: i64,
    pub worst_streak_nonce: u64,
    pub largest_bet: Amount,
    pub lowest_balance: Amount,
    pub busted: bool,
    pub elapsed: Duration,
}

impl SimSummary {
    pub fn bets_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bets as f64 / secs
        } else {
            0.0
        }
    }

    pub fn log(&self) {
        info!(
            bets = self.bets,
            rows_logged = self.rows_logged,
            final_balance = %self.final_balance.to_log_scale(),
            profit = %self.profit.to_log_scale(),
            wagered = %self.wagered.to_log_scale(),
            wins = self.wins,
            worst_streak = self.worst_streak,
            worst_streak_nonce = self.worst_streak_nonce,
            largest_bet = %self.largest_bet.to_log_scale(),
            lowest_balance = %self.lowest_balance.to_log_scale(),
            busted = self.busted,
            run_time_secs = format!("{:.2}", self.elapsed.as_secs_f64()),
            bets_per_sec = format!("{:.2}", self.bets_per_second()),
            "Simulation complete"
        );
    }
}

/// Single-session simulator.
#[derive(Debug)]
pub struct Simulator {
    config: SimConfig,
    seeds: Seeds,
    spins: SpinGenerator,
}

impl Simulator {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let seeds = Seeds::resolve(
            config.server_seed.clone(),
            config.client_seed.clone(),
            config.start_nonce,
        );
        let spins = SpinGenerator::from_seeds(&seeds)?;
        Ok(Self {
            config,
            seeds,
            spins,
        })
    }

    pub fn seeds(&self) -> &Seeds {
        &self.seeds
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Play the session, handing every logged row to `on_row`.
    pub fn run<F>(&self, mut on_row: F) -> SimResult<SimSummary>
    where
        F: FnMut(LogRow) -> SimResult<()>,
    {
        let started = Instant::now();
        let config = &self.config;
        let base_bet = Amount::new(config.base_bet);
        let mut state = BetState::new(Amount::new(config.start_balance), base_bet);

        info!(
            server_seed = %self.seeds.server_seed,
            client_seed = %self.seeds.client_seed,
            start_nonce = self.seeds.start_nonce,
            total_bets = config.total_bets,
            base_bet = %config.base_bet,
            increase_on_loss = %config.increase_on_loss,
            "Starting simulation"
        );

        let mut summary = SimSummary {
            bets: 0,
            rows_logged: 0,
            final_balance: state.balance,
            profit: Amount::ZERO,
            wagered: Amount::ZERO,
            wins: 0,
            worst_streak: 0,
            worst_streak_nonce: 0,
            largest_bet: base_bet,
            lowest_balance: state.balance,
            busted: false,
            elapsed: Duration::ZERO,
        };

        let mut nonce = self.seeds.start_nonce;
        while summary.bets < config.total_bets {
            summary.bets += 1;
            nonce += 1;

            let pocket = self.spins.spin(nonce, 0)?;
            let (outcome, payout) = settle(&pocket);
            let round_profit = state.apply(outcome, payout, config);

            if state.streak < summary.worst_streak {
                summary.worst_streak = state.streak;
                summary.worst_streak_nonce = nonce;
            }

            if state.is_busted() {
                warn!(
                    bet_count = summary.bets,
                    next_bet = %state.next_bet.to_log_scale(),
                    balance = %state.balance.to_log_scale(),
                    "Busted"
                );
                summary.busted = true;
                break;
            }

            summary.largest_bet = summary.largest_bet.max(state.next_bet);
            summary.lowest_balance = summary.lowest_balance.min(state.balance);

            on_row(LogRow {
                bet_count: summary.bets,
                nonce,
                roll: pocket.number,
                color: pocket.color,
                parity: pocket.parity,
                outcome,
                payout,
                bet_amount: state.next_bet.to_log_scale(),
                round_profit: round_profit.to_log_scale(),
                cumulative_profit: state.profit.to_log_scale(),
                balance: state.balance.to_log_scale(),
                current_streak: state.streak,
            })?;
            summary.rows_logged += 1;

            if config.progress_interval > 0 && summary.bets % config.progress_interval == 0 {
                let progress = summary.bets as f64 * 100.0 / config.total_bets as f64;
                info!(
                    progress = format!("{progress:.2}%"),
                    bet_count = summary.bets,
                    balance = %state.balance.inner().round_dp(4),
                    worst_streak = summary.worst_streak,
                    "Simulation progress"
                );
            }
        }

        summary.final_balance = state.balance;
        summary.profit = state.profit;
        summary.wagered = state.wagered;
        summary.wins = state.wins;
        summary.elapsed = started.elapsed();
        Ok(summary)
    }

    /// Play the session and write the bet log to `path`.
    pub fn run_to_csv(&self, path: &Path) -> SimResult<SimSummary> {
        let mut writer = CsvLogWriter::create(path, self.config.write_buffer)?;
        let summary = self.run(|row| Ok(writer.add_row(row)?))?;
        writer.close()?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SERVER: &str = "d83729554eeed8965116385e0486dab8a1f6634ae1a9e8139e849ab75f17341d";
    const CLIENT: &str = "wcvqnIM521";

    fn fixed_config(total_bets: u64) -> SimConfig {
        SimConfig {
            total_bets,
            server_seed: Some(SERVER.to_string()),
            client_seed: Some(CLIENT.to_string()),
            start_nonce: Some(0),
            progress_interval: 0,
            ..Default::default()
        }
    }

    fn collect(config: SimConfig) -> (Vec<LogRow>, SimSummary) {
        let simulator = Simulator::new(config).unwrap();
        let mut rows = Vec::new();
        let summary = simulator
            .run(|row| {
                rows.push(row);
                Ok(())
            })
            .unwrap();
        (rows, summary)
    }

    #[test]
    fn test_settle_rules() {
        let outcome = |n| settle(&Pocket::from_number(n).unwrap());
        assert_eq!(outcome(1), (Outcome::Win, 2));
        assert_eq!(outcome(12), (Outcome::Push, 1));
        assert_eq!(outcome(11), (Outcome::Push, 1));
        assert_eq!(outcome(2), (Outcome::Lose, 0));
        assert_eq!(outcome(0), (Outcome::Lose, 0));
    }

    #[test]
    fn test_martingale_state() {
        let config = SimConfig::default();
        let mut state = BetState::new(Amount::new(dec!(100)), Amount::new(config.base_bet));

        assert_eq!(state.apply(Outcome::Lose, 0, &config), Amount::new(dec!(-0.0016)));
        assert_eq!(state.streak, -1);
        assert_eq!(state.next_bet, Amount::new(dec!(0.0032)));

        assert_eq!(state.apply(Outcome::Push, 1, &config), Amount::ZERO);
        assert_eq!(state.streak, -1);
        assert_eq!(state.next_bet, Amount::new(dec!(0.0032)));

        assert_eq!(state.apply(Outcome::Win, 2, &config), Amount::new(dec!(0.0032)));
        assert_eq!(state.streak, 1);
        assert_eq!(state.next_bet, Amount::new(dec!(0.0016)));
        assert_eq!(state.profit, Amount::new(dec!(0.0016)));
        assert_eq!(state.balance, Amount::new(dec!(100.0016)));
    }

    #[test]
    fn test_fixed_seed_sequence() {
        let (rows, summary) = collect(fixed_config(10));

        let rolls: Vec<u8> = rows.iter().map(|r| r.roll).collect();
        assert_eq!(rolls, vec![29, 2, 28, 1, 9, 7, 24, 22, 7, 31]);

        let streaks: Vec<i64> = rows.iter().map(|r| r.current_streak).collect();
        assert_eq!(streaks, vec![0, -1, -2, 1, 2, 3, -1, -2, 1, 1]);

        assert_eq!(rows[0].nonce, 1);
        assert_eq!(rows[2].bet_amount.to_string(), "0.00640000");
        assert_eq!(rows[9].cumulative_profit.to_string(), "0.00640000");

        assert_eq!(summary.bets, 10);
        assert_eq!(summary.rows_logged, 10);
        assert_eq!(summary.worst_streak, -2);
        assert_eq!(summary.worst_streak_nonce, 3);
        assert_eq!(summary.largest_bet, Amount::new(dec!(0.0064)));
        assert_eq!(summary.lowest_balance, Amount::new(dec!(19999999.9952)));
        assert_eq!(summary.profit, Amount::new(dec!(0.0064)));
        assert!(!summary.busted);
    }

    #[test]
    fn test_deterministic_for_fixed_seeds() {
        let (first, _) = collect(fixed_config(200));
        let (second, _) = collect(fixed_config(200));
        assert_eq!(first, second);
    }

    #[test]
    fn test_bust_stops_before_logging() {
        let config = SimConfig {
            start_balance: dec!(0.005),
            base_bet: dec!(0.0016),
            ..fixed_config(10)
        };
        let (rows, summary) = collect(config);

        // push, then a loss leaves 0.0034 against a 0.0032 stake, then bust
        assert!(summary.busted);
        assert_eq!(summary.bets, 3);
        assert_eq!(rows.len(), 2);
        assert_eq!(summary.rows_logged, 2);
    }

    #[test]
    fn test_run_to_csv_writes_all_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");

        let simulator = Simulator::new(fixed_config(25)).unwrap();
        let summary = simulator.run_to_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("betCount,nonce,roll,color,parity,outcome"));
        assert_eq!(content.lines().count() as u64, summary.rows_logged + 1);
    }
}
