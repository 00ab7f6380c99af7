//! Append-only line log backing both ledger variants.
//!
//! The file handle is opened per call and closed before returning; nothing
//! holds the file open between requests.

pub mod log_reader;
pub mod log_writer;
pub mod record;

pub use log_reader::ReplayScan;
pub use record::Record;

use crate::error::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably append records. Nothing is considered committed unless this
    /// returns `Ok`.
    pub fn append(&self, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        log_writer::append(&self.path, records)
    }

    /// Atomically replace the file content with `records`.
    pub fn rewrite(&self, records: &[Record]) -> Result<()> {
        log_writer::rewrite(&self.path, records)
    }

    pub fn replay(&self) -> ReplayScan {
        log_reader::read_all(&self.path)
    }

    /// Cut the file back to `size` bytes.
    pub fn truncate_to(&self, size: u64) -> Result<()> {
        log_writer::truncate_to(&self.path, size)
    }
}
