//! Log compaction
//!
//! Folds the log into a new snapshot:
//!
//! 1. Materialize the index in ascending id order
//! 2. Replace the snapshot (write-fsync-rename)
//! 3. Truncate the log to empty
//! 4. Clear deleted-id bookkeeping
//!
//! # Key Invariants
//!
//! - Compaction is **deterministic**: Same index → byte-identical snapshot
//! - Compaction is **logically invisible**: The index is not changed
//! - A crash between steps 2 and 3 leaves a log whose effects are already in
//!   the snapshot; replaying it again yields the same index

use crate::index::RecordIndex;
use recordstore_core::{Record, StoreResult};
use recordstore_durability::{LogWriter, SnapshotFile};
use std::fmt;
use std::time::Instant;

/// What caused a compaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompactTrigger {
    /// Operations since the last compaction reached the threshold
    Threshold,
    /// Caller asked for it
    Explicit,
    /// Bulk replacement of the whole collection
    BulkSave,
    /// Collection was cleared
    Clear,
}

impl CompactTrigger {
    /// Get the name of this trigger for logging
    pub fn name(&self) -> &'static str {
        match self {
            CompactTrigger::Threshold => "threshold",
            CompactTrigger::Explicit => "explicit",
            CompactTrigger::BulkSave => "bulk_save",
            CompactTrigger::Clear => "clear",
        }
    }
}

impl fmt::Display for CompactTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a compaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactInfo {
    /// Why it ran
    pub trigger: CompactTrigger,
    /// Records written to the new snapshot
    pub records_written: usize,
    /// Operations folded into the snapshot
    pub frames_compacted: usize,
    /// Log bytes discarded by truncation
    pub log_bytes_reclaimed: u64,
    /// Size of the new snapshot in bytes
    pub snapshot_bytes: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl CompactInfo {
    /// Get a summary string for logging
    pub fn summary(&self) -> String {
        format!(
            "trigger={}, records={}, frames_compacted={}, log_bytes_reclaimed={}, duration_ms={}",
            self.trigger,
            self.records_written,
            self.frames_compacted,
            self.log_bytes_reclaimed,
            self.duration_ms
        )
    }
}

/// Rewrites the snapshot from the index and empties the log
pub struct Compactor<'a> {
    snapshot: &'a SnapshotFile,
    log: &'a mut LogWriter,
}

impl<'a> Compactor<'a> {
    /// Create a compactor over the store's files
    pub fn new(snapshot: &'a SnapshotFile, log: &'a mut LogWriter) -> Self {
        Compactor { snapshot, log }
    }

    /// Run one compaction.
    ///
    /// `frames_pending` is the number of operations being folded in and is
    /// only reported. If the snapshot cannot be written the log is left
    /// untouched.
    pub fn compact<T: Record>(
        &mut self,
        index: &mut RecordIndex<T>,
        trigger: CompactTrigger,
        frames_pending: usize,
    ) -> StoreResult<CompactInfo> {
        let start = Instant::now();

        let snapshot = self.snapshot.write(index.iter())?;
        let log_bytes_reclaimed = self.log.truncate()?;
        index.clear_deleted();

        let info = CompactInfo {
            trigger,
            records_written: snapshot.records,
            frames_compacted: frames_pending,
            log_bytes_reclaimed,
            snapshot_bytes: snapshot.bytes,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            target: "recordstore::compaction",
            trigger = %info.trigger,
            records = info.records_written,
            frames_compacted = info.frames_compacted,
            log_bytes_reclaimed = info.log_bytes_reclaimed,
            snapshot_bytes = info.snapshot_bytes,
            "Compaction complete"
        );

        Ok(info)
    }
}
