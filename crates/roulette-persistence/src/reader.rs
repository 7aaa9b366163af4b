//! Chunked CSV reader for bet logs.
//!
//! Multi-million row logs are parsed in bounded chunks. The total chunk
//! count comes from a line-count pre-scan so progress is determinate.

use crate::error::{PersistenceError, PersistenceResult};
use roulette_core::BetRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use tracing::{debug, info};

/// Rows per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

/// Progress of a chunked load, reported once per chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkProgress {
    /// 1-based index of the chunk just read.
    pub chunk_index: usize,
    /// Expected number of chunks from the pre-scan.
    pub chunks_total: usize,
    /// Rows loaded so far.
    pub rows_loaded: usize,
}

fn open_existing(path: &Path) -> PersistenceResult<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PersistenceError::FileNotFound(path.to_path_buf()),
        _ => PersistenceError::Io(e),
    })
}

/// Count data lines (header excluded) with a full pass over the file.
pub fn count_data_lines(path: impl AsRef<Path>) -> PersistenceResult<usize> {
    let file = open_existing(path.as_ref())?;
    let mut lines = 0usize;
    for line in BufReader::new(file).split(b'\n') {
        line?;
        lines += 1;
    }
    Ok(lines.saturating_sub(1))
}

/// Bet log reader yielding bounded chunks of records.
pub struct LogReader {
    reader: csv::Reader<BufReader<File>>,
    chunk_size: usize,
    exhausted: bool,
}

impl LogReader {
    /// Open a log. Fails with `FileNotFound` if the path is absent.
    pub fn open(path: impl AsRef<Path>, chunk_size: usize) -> PersistenceResult<Self> {
        if chunk_size == 0 {
            return Err(PersistenceError::InvalidChunkSize);
        }
        let path = path.as_ref();
        let file = open_existing(path)?;
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        Ok(Self {
            reader,
            chunk_size,
            exhausted: false,
        })
    }

    /// Read the next chunk of at most `chunk_size` records.
    ///
    /// Returns `None` once the file is exhausted.
    pub fn next_chunk(&mut self) -> PersistenceResult<Option<Vec<BetRecord>>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut chunk = Vec::with_capacity(self.chunk_size.min(64 * 1024));
        for result in self.reader.deserialize::<BetRecord>() {
            chunk.push(result?);
            if chunk.len() == self.chunk_size {
                break;
            }
        }

        if chunk.len() < self.chunk_size {
            self.exhausted = true;
        }

        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }
}

/// Load the whole log into memory, chunk by chunk.
///
/// `on_chunk` is called after every chunk with the running progress.
pub fn load_records(
    path: impl AsRef<Path>,
    chunk_size: usize,
    mut on_chunk: impl FnMut(&ChunkProgress),
) -> PersistenceResult<Vec<BetRecord>> {
    let path = path.as_ref();
    let mut reader = LogReader::open(path, chunk_size)?;

    info!(path = %path.display(), "Determining file size for progress");
    let data_lines = count_data_lines(path)?;
    let chunks_total = data_lines / chunk_size + 1;
    debug!(data_lines, chunks_total, chunk_size, "Pre-scan complete");

    let mut records = Vec::with_capacity(data_lines);
    let mut chunk_index = 0usize;
    while let Some(chunk) = reader.next_chunk()? {
        chunk_index += 1;
        records.extend(chunk);
        on_chunk(&ChunkProgress {
            chunk_index,
            chunks_total,
            rows_loaded: records.len(),
        });
    }

    info!(path = %path.display(), rows = records.len(), chunks = chunk_index, "Bet log loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roulette_core::Outcome;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "betCount,balance,currentStreak,outcome,roll\n";

    fn write_log(rows: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        for i in 1..=rows {
            let outcome = if i % 2 == 0 { "lose" } else { "win" };
            let streak = if i % 2 == 0 { -1 } else { 1 };
            writeln!(file, "{},{}.5,{},{},{}", i, 1000 + i, streak, outcome, i % 37).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let err = LogReader::open("/definitely/not/here.csv", 10).err().unwrap();
        assert!(matches!(err, PersistenceError::FileNotFound(_)));

        let err = count_data_lines("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, PersistenceError::FileNotFound(_)));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let file = write_log(1);
        assert!(matches!(
            LogReader::open(file.path(), 0),
            Err(PersistenceError::InvalidChunkSize)
        ));
    }

    #[test]
    fn test_count_data_lines_excludes_header() {
        let file = write_log(25);
        assert_eq!(count_data_lines(file.path()).unwrap(), 25);

        let empty = write_log(0);
        assert_eq!(count_data_lines(empty.path()).unwrap(), 0);
    }

    #[test]
    fn test_chunks_are_bounded() {
        let file = write_log(25);
        let mut reader = LogReader::open(file.path(), 10).unwrap();

        let sizes: Vec<usize> = std::iter::from_fn(|| reader.next_chunk().unwrap())
            .map(|c| c.len())
            .collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[test]
    fn test_exact_multiple_of_chunk_size() {
        let file = write_log(20);
        let mut reader = LogReader::open(file.path(), 10).unwrap();
        assert_eq!(reader.next_chunk().unwrap().unwrap().len(), 10);
        assert_eq!(reader.next_chunk().unwrap().unwrap().len(), 10);
        assert!(reader.next_chunk().unwrap().is_none());
    }

    #[test]
    fn test_chunked_load_matches_single_pass() {
        let file = write_log(37);
        let chunked = load_records(file.path(), 4, |_| {}).unwrap();
        let single = load_records(file.path(), 1_000, |_| {}).unwrap();
        assert_eq!(chunked, single);
        assert_eq!(chunked.len(), 37);

        let first = &chunked[0];
        assert_eq!(first.bet_count, 1);
        assert_eq!(first.balance.inner(), dec!(1001.5));
        assert_eq!(first.outcome, Outcome::Win);
    }

    #[test]
    fn test_progress_reports_every_chunk() {
        let file = write_log(25);
        let mut seen = Vec::new();
        load_records(file.path(), 10, |p| seen.push(*p)).unwrap();

        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|p| p.chunks_total == 3));
        assert_eq!(seen.last().unwrap().rows_loaded, 25);
        assert_eq!(seen.last().unwrap().chunk_index, 3);
    }

    #[test]
    fn test_header_only_loads_nothing() {
        let file = write_log(0);
        let records = load_records(file.path(), 10, |_| {}).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_extra_columns_ignored() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "betCount,nonce,roll,color,parity,outcome,payout,balance,currentStreak"
        )
        .unwrap();
        writeln!(file, "1,42,19,red,odd,win,2,100.00000000,1").unwrap();
        file.flush().unwrap();

        let records = load_records(file.path(), 10, |_| {}).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].roll, 19);
        assert_eq!(records[0].current_streak, 1);
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "betCount,balance,outcome,roll").unwrap();
        writeln!(file, "1,100,win,3").unwrap();
        file.flush().unwrap();

        let err = load_records(file.path(), 10, |_| {}).unwrap_err();
        assert!(matches!(err, PersistenceError::Csv(_)));
    }
}
