//! Bet log persistence.
//!
//! Reads the simulator's CSV log in bounded chunks for analysis and writes
//! it with a buffered, header-first CSV writer.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{PersistenceError, PersistenceResult};
pub use reader::{count_data_lines, load_records, ChunkProgress, LogReader, DEFAULT_CHUNK_SIZE};
pub use writer::{CsvLogWriter, LogRow};
