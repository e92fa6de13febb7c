//! WAL reader for recovery and replay.
//!
//! Frames are read in file order, which is the order they were appended.
//! Under [`ReplayMode::Permissive`] a frame that fails to decode is skipped
//! and reported in [`LogReadResult::skipped`]; under [`ReplayMode::Strict`]
//! the first such frame aborts the read.

use super::frame::{FrameError, Operation};
use super::mode::ReplayMode;
use crate::error::{DurabilityError, DurabilityResult};
use recordstore_core::Record;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reader for the operation log.
pub struct LogReader {
    path: PathBuf,
    mode: ReplayMode,
}

impl LogReader {
    /// Create a new reader for the log at `path`.
    pub fn new(path: impl Into<PathBuf>, mode: ReplayMode) -> Self {
        LogReader {
            path: path.into(),
            mode,
        }
    }

    /// Read every frame of the log.
    ///
    /// A missing log file reads as empty. Blank lines are ignored.
    pub fn read_all<T: Record>(&self) -> DurabilityResult<LogReadResult<T>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LogReadResult::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut result = LogReadResult::default();
        let mut reader = BufReader::new(file);
        let mut buffer = Vec::new();
        let mut offset = 0u64;
        let mut line_number = 0usize;

        loop {
            buffer.clear();
            let read = reader.read_until(b'\n', &mut buffer)?;
            if read == 0 {
                break;
            }
            line_number += 1;
            let frame_start = offset;
            offset += read as u64;

            let terminated = buffer.last() == Some(&b'\n');
            let bytes = if terminated {
                &buffer[..buffer.len() - 1]
            } else {
                &buffer[..]
            };

            let decoded = match std::str::from_utf8(bytes) {
                Ok(text) if text.trim().is_empty() => None,
                Ok(text) => Some(Operation::<T>::decode(text.trim_end_matches('\r'))),
                Err(_) => Some(Err(FrameError::InvalidUtf8)),
            };

            let applied = match decoded {
                None => true,
                Some(Ok(op)) => {
                    result.operations.push(op);
                    true
                }
                Some(Err(e)) => {
                    if self.mode.is_strict() {
                        return Err(DurabilityError::CorruptFrame {
                            path: self.path.clone(),
                            line: line_number,
                            detail: e.to_string(),
                        });
                    }
                    tracing::warn!(
                        target: "recordstore::wal",
                        path = %self.path.display(),
                        line = line_number,
                        error = %e,
                        "Skipping unreadable log frame"
                    );
                    result.skipped.push(SkippedFrame {
                        line: line_number,
                        detail: e.to_string(),
                    });
                    false
                }
            };

            if !terminated {
                result.torn_tail = Some(TornTail {
                    offset: frame_start,
                    len: read as u64,
                    applied,
                });
            }
        }

        result.lines_read = line_number;
        Ok(result)
    }

    /// Log mode this reader was built with
    pub fn mode(&self) -> ReplayMode {
        self.mode
    }

    /// Get the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A frame that was skipped during a permissive read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFrame {
    /// 1-based line number
    pub line: usize,
    /// Why it could not be decoded
    pub detail: String,
}

/// Final frame without its terminating newline, left by a crash mid-append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TornTail {
    /// Byte offset where the frame starts
    pub offset: u64,
    /// Length of the frame in bytes
    pub len: u64,
    /// Whether the frame decoded and was returned with the operations
    pub applied: bool,
}

/// Result of reading the whole log.
#[derive(Debug)]
pub struct LogReadResult<T> {
    /// All decoded operations in file order
    pub operations: Vec<Operation<T>>,
    /// Frames skipped because they failed to decode
    pub skipped: Vec<SkippedFrame>,
    /// Unterminated final frame, if any
    pub torn_tail: Option<TornTail>,
    /// Number of physical lines read, blank ones included
    pub lines_read: usize,
}

impl<T> Default for LogReadResult<T> {
    fn default() -> Self {
        LogReadResult {
            operations: Vec::new(),
            skipped: Vec::new(),
            torn_tail: None,
            lines_read: 0,
        }
    }
}
