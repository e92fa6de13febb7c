//! Store file layout
//!
//! A store is a pair of files next to each other, plus a transient
//! temporary file that only exists while a snapshot is being replaced:
//!
//! ```text
//! students.json        # snapshot (JSON array of records)
//! students.json.wal    # operation log (one JSON frame per line)
//! students.json.tmp    # next snapshot, renamed over students.json
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to the snapshot path to get the log path
pub const LOG_SUFFIX: &str = ".wal";

/// Suffix appended to the snapshot path to get the temporary snapshot path
pub const TEMP_SUFFIX: &str = ".tmp";

/// Paths of the files that make up one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    snapshot: PathBuf,
}

impl StorePaths {
    /// Derive all paths from the snapshot path
    pub fn new(snapshot: impl AsRef<Path>) -> Self {
        StorePaths {
            snapshot: snapshot.as_ref().to_path_buf(),
        }
    }

    /// Snapshot file path
    pub fn snapshot(&self) -> &Path {
        &self.snapshot
    }

    /// Operation log path (`<snapshot>.wal`)
    pub fn log(&self) -> PathBuf {
        with_suffix(&self.snapshot, LOG_SUFFIX)
    }

    /// Temporary snapshot path used during compaction (`<snapshot>.tmp`)
    pub fn temp(&self) -> PathBuf {
        with_suffix(&self.snapshot, TEMP_SUFFIX)
    }

    /// Directory holding the files.
    ///
    /// A bare file name resolves to the current directory.
    pub fn dir(&self) -> PathBuf {
        match self.snapshot.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
