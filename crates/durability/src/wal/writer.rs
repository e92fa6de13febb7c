//! WAL writer with durability mode support.
//!
//! The writer appends one encoded frame per line. Every call opens the log
//! file, writes, flushes (and fsyncs under [`DurabilityMode::Always`]) and
//! closes it again, so no handle outlives a single operation.

use super::frame::Operation;
use super::mode::DurabilityMode;
use super::reader::TornTail;
use crate::error::{DurabilityError, DurabilityResult};
use recordstore_core::Record;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Cumulative WAL operation counters.
///
/// These counters accumulate over the lifetime of the LogWriter and are
/// never reset, not even by truncation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalCounters {
    /// Total frames appended
    pub wal_appends: u64,
    /// Total fsync calls made by appends and truncations
    pub sync_calls: u64,
    /// Total bytes appended, newlines included
    pub bytes_written: u64,
    /// Total nanoseconds spent in fsync calls
    pub sync_nanos: u64,
}

/// Append-only writer for the operation log.
pub struct LogWriter {
    path: PathBuf,
    durability: DurabilityMode,
    counters: WalCounters,
}

impl LogWriter {
    /// Create a writer for the log at `path`.
    ///
    /// No file is touched until the first append.
    pub fn new(path: impl Into<PathBuf>, durability: DurabilityMode) -> Self {
        LogWriter {
            path: path.into(),
            durability,
            counters: WalCounters::default(),
        }
    }

    /// Append one operation as a new frame.
    ///
    /// The operation is durable (under `Always`) once this returns.
    /// Returns the number of bytes written.
    pub fn append<T: Record>(&mut self, op: &Operation<T>) -> DurabilityResult<u64> {
        let mut line = op
            .encode()
            .map_err(|e| DurabilityError::Encode(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        if self.durability.requires_immediate_fsync() {
            let start = Instant::now();
            file.sync_data()?;
            self.record_sync(start);
        }

        let written = line.len() as u64;
        self.counters.wal_appends += 1;
        self.counters.bytes_written += written;

        tracing::debug!(
            target: "recordstore::wal",
            kind = %op.kind,
            id = op.id,
            bytes = written,
            "Appended log frame"
        );

        Ok(written)
    }

    /// Truncate the log to empty.
    ///
    /// Creates the file if it does not exist. Always fsyncs.
    /// Returns the number of bytes discarded.
    pub fn truncate(&mut self) -> DurabilityResult<u64> {
        let previous = log_len(&self.path)?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        let start = Instant::now();
        file.sync_all()?;
        self.record_sync(start);

        Ok(previous)
    }

    /// Repair an unterminated final frame left by a crash.
    ///
    /// A tail that decoded and was applied gets its missing newline, so the
    /// next append starts on a fresh line. A tail that did not decode is cut
    /// off at the end of the last complete frame.
    pub fn repair_tail(&mut self, tail: &TornTail) -> DurabilityResult<()> {
        if tail.applied {
            let mut file = OpenOptions::new().append(true).open(&self.path)?;
            file.write_all(b"\n")?;
            let start = Instant::now();
            file.sync_data()?;
            self.record_sync(start);
            tracing::warn!(
                target: "recordstore::wal",
                path = %self.path.display(),
                offset = tail.offset,
                "Sealed unterminated final log frame"
            );
        } else {
            let file = OpenOptions::new().write(true).open(&self.path)?;
            file.set_len(tail.offset)?;
            let start = Instant::now();
            file.sync_all()?;
            self.record_sync(start);
            tracing::warn!(
                target: "recordstore::wal",
                path = %self.path.display(),
                offset = tail.offset,
                bytes_discarded = tail.len,
                "Truncated torn final log frame"
            );
        }
        Ok(())
    }

    fn record_sync(&mut self, start: Instant) {
        self.counters.sync_calls += 1;
        self.counters.sync_nanos += start.elapsed().as_nanos() as u64;
    }

    /// Current size of the log file in bytes (0 when absent)
    pub fn len(&self) -> DurabilityResult<u64> {
        log_len(&self.path)
    }

    /// Whether the log file is absent or empty
    pub fn is_empty(&self) -> DurabilityResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Get a snapshot of cumulative WAL counters.
    pub fn counters(&self) -> WalCounters {
        self.counters.clone()
    }

    /// Configured durability mode
    pub fn durability(&self) -> DurabilityMode {
        self.durability
    }

    /// Get the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn log_len(path: &Path) -> DurabilityResult<u64> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e.into()),
    }
}
