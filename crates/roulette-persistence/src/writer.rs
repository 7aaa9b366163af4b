//! Buffered CSV writer for the simulator's bet log.
//!
//! The header is written as soon as the file is opened, so a run that busts
//! on the first bet still leaves a valid (empty) log behind.

use crate::error::PersistenceResult;
use roulette_core::{Amount, Color, Outcome, Parity};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Full bet log row as produced by the simulator.
///
/// `BetRecord` reads a subset of these columns by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRow {
    pub bet_count: u64,
    pub nonce: u64,
    pub roll: u8,
    pub color: Color,
    pub parity: Parity,
    pub outcome: Outcome,
    pub payout: u8,
    /// Stake for the next round.
    pub bet_amount: Amount,
    pub round_profit: Amount,
    pub cumulative_profit: Amount,
    pub balance: Amount,
    pub current_streak: i64,
}

impl LogRow {
    pub const HEADER: [&'static str; 12] = [
        "betCount",
        "nonce",
        "roll",
        "color",
        "parity",
        "outcome",
        "payout",
        "betAmount",
        "roundProfit",
        "cumulativeProfit",
        "balance",
        "currentStreak",
    ];
}

/// CSV writer for bet log rows.
///
/// Truncates any existing file. Rows are buffered and flushed once the
/// buffer fills, on `close`, or on drop.
pub struct CsvLogWriter {
    writer: csv::Writer<BufWriter<File>>,
    path: PathBuf,
    buffer: Vec<LogRow>,
    max_buffer_size: usize,
    records_written: usize,
}

impl CsvLogWriter {
    /// Create the log file (and parent directories) and write the header.
    pub fn create(path: impl AsRef<Path>, max_buffer_size: usize) -> PersistenceResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Opening bet log writer");

        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        writer.write_record(LogRow::HEADER)?;

        let max_buffer_size = max_buffer_size.max(1);
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            buffer: Vec::with_capacity(max_buffer_size),
            max_buffer_size,
            records_written: 0,
        })
    }

    /// Add a row to the buffer, flushing when it is full.
    pub fn add_row(&mut self, row: LogRow) -> PersistenceResult<()> {
        self.buffer.push(row);

        if self.buffer.len() >= self.max_buffer_size {
            self.flush()?;
        }

        Ok(())
    }

    /// Write buffered rows through to disk.
    pub fn flush(&mut self) -> PersistenceResult<()> {
        let row_count = self.buffer.len();
        for row in self.buffer.drain(..) {
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        self.records_written += row_count;

        if row_count > 0 {
            debug!(rows = row_count, total = self.records_written, "Flushed bet log rows");
        }
        Ok(())
    }

    /// Flush pending rows and report the final count.
    pub fn close(mut self) -> PersistenceResult<usize> {
        self.flush()?;
        info!(
            path = %self.path.display(),
            records = self.records_written,
            "Closed bet log writer"
        );
        Ok(self.records_written)
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }
}

impl Drop for CsvLogWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        if let Err(e) = self.flush() {
            warn!(?e, "Failed to flush bet log on drop");
        }
    }
}
