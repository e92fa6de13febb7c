//! WAL-backed record store
//!
//! [`WalStore`] is the storage engine facade: every mutation is appended to
//! the operation log before it is applied to the in-memory index, and the
//! log is folded into the snapshot once `compact_threshold` operations have
//! accumulated.
//!
//! ## Lifecycle
//!
//! A store starts [`StoreState::Unloaded`]. The first operation replays the
//! snapshot and log and moves it to [`StoreState::Loaded`].
//! [`WalStore::open`] performs the transition eagerly. A failed bulk
//! [`save`](WalStore::save) or [`clear`](WalStore::clear) drops back to
//! Unloaded, so the next operation rebuilds the index from disk.
//!
//! ## Ownership
//!
//! A store assumes it is the only writer of its file pair. Two instances
//! pointed at the same files at the same time produce undefined results.

use crate::compaction::{CompactInfo, CompactTrigger, Compactor};
use crate::config::StoreConfig;
use crate::index::RecordIndex;
use crate::recovery::{ReplayStats, Replayer};
use recordstore_core::{Record, RecordId, StoreError, StoreResult};
use recordstore_durability::{
    LogReader, LogWriter, Operation, SnapshotFile, StorePaths, WalCounters,
};
use std::collections::BTreeSet;
use std::path::Path;

/// Whether the index has been built from disk yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Nothing read from disk yet
    Unloaded,
    /// Index reflects snapshot + log
    Loaded,
}

/// Write-ahead-log backed store for records of type `T`
pub struct WalStore<T> {
    paths: StorePaths,
    config: StoreConfig,
    snapshot: SnapshotFile,
    reader: LogReader,
    writer: LogWriter,
    index: RecordIndex<T>,
    state: StoreState,
    ops_since_compact: usize,
    last_replay: Option<ReplayStats>,
    last_compaction: Option<CompactInfo>,
}

impl<T: Record> WalStore<T> {
    /// Create a store over `snapshot_path` without touching the disk.
    ///
    /// The log lives next to it at `<snapshot_path>.wal`.
    pub fn new(snapshot_path: impl AsRef<Path>, config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let paths = StorePaths::new(snapshot_path);
        Ok(WalStore {
            snapshot: SnapshotFile::new(paths.clone()),
            reader: LogReader::new(paths.log(), config.replay_mode),
            writer: LogWriter::new(paths.log(), config.durability),
            paths,
            config,
            index: RecordIndex::new(),
            state: StoreState::Unloaded,
            ops_since_compact: 0,
            last_replay: None,
            last_compaction: None,
        })
    }

    /// Create a store and replay its files immediately.
    pub fn open(snapshot_path: impl AsRef<Path>, config: StoreConfig) -> StoreResult<Self> {
        let mut store = Self::new(snapshot_path, config)?;
        store.ensure_loaded()?;
        Ok(store)
    }

    /// Replay snapshot + log if this instance has not done so yet.
    fn ensure_loaded(&mut self) -> StoreResult<()> {
        if self.state == StoreState::Loaded {
            return Ok(());
        }

        let (index, stats) = Replayer::new(&self.snapshot, &self.reader).replay(&mut self.writer)?;
        self.index = index;
        self.ops_since_compact = stats.frames_applied;
        self.last_replay = Some(stats);
        self.state = StoreState::Loaded;
        Ok(())
    }

    /// Append `op` to the log, then apply it to the index.
    ///
    /// Nothing changes in memory if the append fails. Reaching the
    /// threshold compacts before returning; if that compaction fails the
    /// operation stays applied and the error is returned.
    fn commit(&mut self, op: Operation<T>) -> StoreResult<()> {
        self.writer.append(&op)?;
        self.index.apply(op);
        self.ops_since_compact += 1;

        if self.ops_since_compact >= self.config.compact_threshold {
            self.compact(CompactTrigger::Threshold)?;
        }
        Ok(())
    }

    fn compact(&mut self, trigger: CompactTrigger) -> StoreResult<CompactInfo> {
        let info = Compactor::new(&self.snapshot, &mut self.writer).compact(
            &mut self.index,
            trigger,
            self.ops_since_compact,
        )?;
        self.ops_since_compact = 0;
        self.last_compaction = Some(info.clone());
        Ok(info)
    }

    /// Insert a new record.
    ///
    /// Fails with [`StoreError::Conflict`] if the id is already live.
    ///
    /// # Errors
    ///
    /// If the append succeeds but the threshold compaction that follows
    /// fails, the operation is already durable and applied, yet the call
    /// returns the compaction error. Check [`compaction_pending`] before
    /// retrying: a retried insert then reports `Conflict`.
    ///
    /// [`compaction_pending`]: Self::compaction_pending
    pub fn insert(&mut self, record: T) -> StoreResult<()> {
        self.ensure_loaded()?;
        let id = record.id();
        if self.index.contains(id) {
            return Err(StoreError::Conflict(id));
        }
        self.commit(Operation::insert(record))
    }

    /// Replace an existing record.
    ///
    /// Fails with [`StoreError::NotFound`] if the id is not live. A failed
    /// threshold compaction is reported as for [`insert`](Self::insert).
    pub fn update(&mut self, record: T) -> StoreResult<()> {
        self.ensure_loaded()?;
        let id = record.id();
        if !self.index.contains(id) {
            return Err(StoreError::NotFound(id));
        }
        self.commit(Operation::update(record))
    }

    /// Remove a record.
    ///
    /// Fails with [`StoreError::NotFound`] if the id is not live. A failed
    /// threshold compaction is reported as for [`insert`](Self::insert).
    pub fn delete(&mut self, id: RecordId) -> StoreResult<()> {
        self.ensure_loaded()?;
        if !self.index.contains(id) {
            return Err(StoreError::NotFound(id));
        }
        self.commit(Operation::delete(id))
    }

    /// Record with this id.
    pub fn load_by_id(&mut self, id: RecordId) -> StoreResult<T> {
        self.ensure_loaded()?;
        self.index.get(id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// All live records, ascending by id.
    pub fn load_all(&mut self) -> StoreResult<Vec<T>> {
        self.ensure_loaded()?;
        Ok(self.index.iter().cloned().collect())
    }

    /// Up to `limit` records starting at the `offset`-th, ascending by id.
    pub fn load_range(&mut self, offset: usize, limit: usize) -> StoreResult<Vec<T>> {
        self.ensure_loaded()?;
        Ok(self.index.range(offset, limit))
    }

    /// Records for `ids`, in input order, omitting ids that are not live.
    pub fn load_by_ids(&mut self, ids: &[RecordId]) -> StoreResult<Vec<T>> {
        self.ensure_loaded()?;
        Ok(self.index.get_many(ids))
    }

    /// Whether a record with this id is live.
    pub fn exists(&mut self, id: RecordId) -> StoreResult<bool> {
        self.ensure_loaded()?;
        Ok(self.index.contains(id))
    }

    /// Number of live records.
    pub fn count(&mut self) -> StoreResult<usize> {
        self.ensure_loaded()?;
        Ok(self.index.len())
    }

    /// Replace the whole collection with `items` and compact.
    ///
    /// Bypasses the log: the new content goes straight to the snapshot.
    /// Items sharing an id keep the last one. A crash at any point leaves
    /// either the previous collection or `items` on disk.
    pub fn save(&mut self, items: &[T]) -> StoreResult<CompactInfo> {
        let mut replacement = RecordIndex::new();
        replacement.replace_all(items.to_vec());
        self.replace(replacement, CompactTrigger::BulkSave)
    }

    /// Remove every record, leaving an empty snapshot and an empty log.
    pub fn clear(&mut self) -> StoreResult<CompactInfo> {
        self.replace(RecordIndex::new(), CompactTrigger::Clear)
    }

    /// Write `replacement` as the new snapshot and adopt it.
    ///
    /// Pending log frames are folded into the current snapshot first, so the
    /// log is empty when the replacement is renamed into place. The index
    /// only changes once the replacement is on disk.
    fn replace(
        &mut self,
        mut replacement: RecordIndex<T>,
        trigger: CompactTrigger,
    ) -> StoreResult<CompactInfo> {
        if !self.writer.is_empty()? {
            self.ensure_loaded()?;
            self.compact(trigger)?;
        }

        let result =
            Compactor::new(&self.snapshot, &mut self.writer).compact(&mut replacement, trigger, 0);
        match result {
            Ok(info) => {
                self.index = replacement;
                self.state = StoreState::Loaded;
                self.ops_since_compact = 0;
                self.last_compaction = Some(info.clone());
                Ok(info)
            }
            Err(e) => {
                // Disk may hold either collection now; rebuild from it on next use
                self.state = StoreState::Unloaded;
                Err(e)
            }
        }
    }

    /// Fold the log into the snapshot now.
    pub fn force_compact(&mut self) -> StoreResult<CompactInfo> {
        self.ensure_loaded()?;
        self.compact(CompactTrigger::Explicit)
    }

    /// Operations logged since the last compaction
    pub fn operations_since_compact(&self) -> usize {
        self.ops_since_compact
    }

    /// Whether the threshold was reached but compaction has not succeeded.
    ///
    /// Only true after a failed threshold compaction; the next mutation or
    /// [`force_compact`](Self::force_compact) retries it.
    pub fn compaction_pending(&self) -> bool {
        self.ops_since_compact >= self.config.compact_threshold
    }

    /// Ids deleted since the last compaction
    pub fn deleted_ids(&self) -> &BTreeSet<RecordId> {
        self.index.deleted_ids()
    }

    /// Lifecycle state
    pub fn state(&self) -> StoreState {
        self.state
    }

    /// Whether the index has been built from disk
    pub fn is_loaded(&self) -> bool {
        self.state == StoreState::Loaded
    }

    /// Statistics from the replay that loaded this instance
    pub fn last_replay(&self) -> Option<&ReplayStats> {
        self.last_replay.as_ref()
    }

    /// Result of the most recent compaction by this instance
    pub fn last_compaction(&self) -> Option<&CompactInfo> {
        self.last_compaction.as_ref()
    }

    /// Cumulative log writer counters
    pub fn wal_counters(&self) -> WalCounters {
        self.writer.counters()
    }

    /// File layout of this store
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Configuration this store was built with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}
