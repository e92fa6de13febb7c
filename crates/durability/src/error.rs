//! Durability layer errors

use recordstore_core::StoreError;
use std::io;
use std::path::PathBuf;

/// Errors raised while reading or writing the snapshot and log files.
#[derive(Debug, thiserror::Error)]
pub enum DurabilityError {
    /// I/O error on one of the store files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record or operation could not be encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// The snapshot document could not be decoded
    #[error("Corrupt snapshot {}: {detail}", .path.display())]
    CorruptSnapshot {
        /// Snapshot file path
        path: PathBuf,
        /// Decoder message
        detail: String,
    },

    /// A log frame could not be decoded (strict replay only)
    #[error("Corrupt log frame at {}:{line}: {detail}", .path.display())]
    CorruptFrame {
        /// Log file path
        path: PathBuf,
        /// 1-based line number of the frame
        line: usize,
        /// Decoder message
        detail: String,
    },
}

/// Result alias for durability operations
pub type DurabilityResult<T> = Result<T, DurabilityError>;

impl From<DurabilityError> for StoreError {
    fn from(e: DurabilityError) -> Self {
        match e {
            DurabilityError::Io(e) => StoreError::Io(e),
            DurabilityError::Encode(detail) => StoreError::Serialization(detail),
            DurabilityError::CorruptSnapshot { path, detail } => {
                StoreError::Corruption { path, detail }
            }
            DurabilityError::CorruptFrame { path, line, detail } => StoreError::Corruption {
                path,
                detail: format!("line {}: {}", line, detail),
            },
        }
    }
}
