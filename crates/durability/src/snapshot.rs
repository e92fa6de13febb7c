//! Crash-safe snapshot file
//!
//! The snapshot is a single JSON array holding every live record in
//! ascending id order. It is replaced with the write-fsync-rename pattern:
//!
//! 1. Write the full document to `<snapshot>.tmp`
//! 2. fsync the temporary file
//! 3. Atomic rename over `<snapshot>`
//! 4. fsync the parent directory
//!
//! Either the old or the new snapshot is visible after a crash, never a
//! partially written one. A leftover `.tmp` file only means a compaction
//! did not finish and is safe to delete.

use crate::error::{DurabilityError, DurabilityResult};
use crate::paths::StorePaths;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Reader and writer for one snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    paths: StorePaths,
}

impl SnapshotFile {
    /// Create a handle for the snapshot described by `paths`
    pub fn new(paths: StorePaths) -> Self {
        SnapshotFile { paths }
    }

    /// Snapshot file path
    pub fn path(&self) -> &Path {
        self.paths.snapshot()
    }

    /// Whether a snapshot has been written
    pub fn exists(&self) -> bool {
        self.paths.snapshot().exists()
    }

    /// Load every record in the snapshot.
    ///
    /// A missing or zero-length file reads as an empty collection. Anything
    /// else that is not a JSON array of records is a corruption error.
    pub fn read<T: DeserializeOwned>(&self) -> DurabilityResult<Vec<T>> {
        let bytes = match std::fs::read(self.paths.snapshot()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            if !bytes.is_empty() {
                tracing::warn!(
                    target: "recordstore::snapshot",
                    path = %self.path().display(),
                    "Snapshot contains only whitespace, treating as empty"
                );
            }
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| DurabilityError::CorruptSnapshot {
            path: self.path().to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Replace the snapshot with `records` using the crash-safe pattern.
    pub fn write<'a, T, I>(&self, records: I) -> DurabilityResult<SnapshotInfo>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let records: Vec<&T> = records.into_iter().collect();
        let document = serde_json::to_vec_pretty(&records)
            .map_err(|e| DurabilityError::Encode(e.to_string()))?;

        let final_path = self.paths.snapshot();
        let temp_path = self.paths.temp();

        // Step 1: Write to temporary file
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(&document)?;

        // Step 2: fsync the file
        file.sync_all()?;
        drop(file);

        // Step 3: Atomic rename
        std::fs::rename(&temp_path, final_path)?;

        // Step 4: fsync parent directory
        sync_dir(&self.paths.dir())?;

        Ok(SnapshotInfo {
            path: final_path.to_path_buf(),
            records: records.len(),
            bytes: document.len() as u64,
        })
    }

    /// Remove a temporary file left behind by an interrupted compaction.
    ///
    /// Returns true if a file was removed.
    pub fn cleanup_temp_file(&self) -> DurabilityResult<bool> {
        match std::fs::remove_file(self.paths.temp()) {
            Ok(()) => {
                tracing::warn!(
                    target: "recordstore::snapshot",
                    path = %self.paths.temp().display(),
                    "Removed stale temporary snapshot"
                );
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a temporary snapshot file exists
    pub fn temp_file_exists(&self) -> bool {
        self.paths.temp().exists()
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// Information about a written snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    /// Path to the snapshot file
    pub path: PathBuf,
    /// Number of records written
    pub records: usize,
    /// Size of the document in bytes
    pub bytes: u64,
}
