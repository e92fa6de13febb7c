//! Error types for recordstore
//!
//! Every failure the engine can report is a variant of [`StoreError`].
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Logical failures (`NotFound`, `Conflict`) are kept apart from I/O and
//! corruption failures so callers can branch on them without string matching.

use crate::record::RecordId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Error types for the record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// File could not be opened, read, written or synced
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record or operation could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Structured content on disk could not be decoded
    #[error("Data corruption in {}: {detail}", .path.display())]
    Corruption {
        /// File that holds the corrupt content
        path: PathBuf,
        /// What failed to decode (includes the line number for log frames)
        detail: String,
    },

    /// No live record with this id
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// A live record with this id already exists
    #[error("Record already exists: {0}")]
    Conflict(RecordId),

    /// Configuration rejected by validation or parsing
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage strategy that exists by name only
    #[error("Unsupported storage strategy: {0}")]
    Unsupported(String),
}

impl StoreError {
    /// Create a corruption error for `path`
    pub fn corruption(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        StoreError::Corruption {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// True for [`StoreError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// True for [`StoreError::Conflict`]
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }

    /// True for [`StoreError::Corruption`]
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::Corruption { .. })
    }

    /// True for the logical failures (`NotFound`, `Conflict`)
    pub fn is_logical(&self) -> bool {
        self.is_not_found() || self.is_conflict()
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
