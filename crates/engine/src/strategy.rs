//! Storage strategy selection
//!
//! Callers that only need bulk `save`/`load`/`clear` work against
//! [`RecordStorage`] and stay agnostic to how records reach the disk. The
//! strategy is picked once, at construction, through an explicit
//! [`StorageKind`].
//!
//! | Kind | Implementation | Writes |
//! |------|----------------|--------|
//! | SnapshotOnly | [`SnapshotStore`] | Rewrite the whole file |
//! | WriteAheadLog | [`WalStore`] | Append a frame, compact periodically |
//! | Database | none | Rejected with `Unsupported` |

use crate::config::StoreConfig;
use crate::snapshot_store::SnapshotStore;
use crate::wal_store::WalStore;
use recordstore_core::{Record, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Bulk storage contract shared by every strategy
pub trait RecordStorage<T: Record> {
    /// Replace the stored collection with `items`
    fn save(&mut self, items: &[T]) -> StoreResult<()>;

    /// Read the stored collection
    fn load(&mut self) -> StoreResult<Vec<T>>;

    /// Remove every stored record
    fn clear(&mut self) -> StoreResult<()>;

    /// Which strategy this is
    fn kind(&self) -> StorageKind;
}

impl<T: Record> RecordStorage<T> for SnapshotStore<T> {
    fn save(&mut self, items: &[T]) -> StoreResult<()> {
        SnapshotStore::save(self, items)
    }

    fn load(&mut self) -> StoreResult<Vec<T>> {
        SnapshotStore::load(self)
    }

    fn clear(&mut self) -> StoreResult<()> {
        SnapshotStore::clear(self)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::SnapshotOnly
    }
}

impl<T: Record> RecordStorage<T> for WalStore<T> {
    fn save(&mut self, items: &[T]) -> StoreResult<()> {
        WalStore::save(self, items).map(|_| ())
    }

    fn load(&mut self) -> StoreResult<Vec<T>> {
        self.load_all()
    }

    fn clear(&mut self) -> StoreResult<()> {
        WalStore::clear(self).map(|_| ())
    }

    fn kind(&self) -> StorageKind {
        StorageKind::WriteAheadLog
    }
}

/// Available storage strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Whole-file rewrite on every save
    SnapshotOnly,
    /// Operation log plus periodic snapshot
    WriteAheadLog,
    /// Reserved name for a database-backed strategy; not implemented
    Database,
}

impl StorageKind {
    /// Get the name of this strategy for logging
    pub fn name(&self) -> &'static str {
        match self {
            StorageKind::SnapshotOnly => "snapshot_only",
            StorageKind::WriteAheadLog => "write_ahead_log",
            StorageKind::Database => "database",
        }
    }

    /// Whether [`StorageFactory::create`] can build this strategy
    pub fn is_available(&self) -> bool {
        !matches!(self, StorageKind::Database)
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Suggested strategy for an expected workload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    /// Suggested strategy
    pub kind: StorageKind,
    /// Short explanation
    pub reason: &'static str,
}

/// Builds storage strategies
pub struct StorageFactory;

impl StorageFactory {
    /// Build the strategy `kind` over `path`.
    ///
    /// `config` only applies to [`StorageKind::WriteAheadLog`].
    pub fn create<T: Record + 'static>(
        kind: StorageKind,
        path: impl AsRef<Path>,
        config: StoreConfig,
    ) -> StoreResult<Box<dyn RecordStorage<T>>> {
        let storage: Box<dyn RecordStorage<T>> = match kind {
            StorageKind::SnapshotOnly => Box::new(SnapshotStore::new(path)),
            StorageKind::WriteAheadLog => Box::new(WalStore::new(path, config)?),
            StorageKind::Database => {
                return Err(StoreError::Unsupported(format!(
                    "{} storage is not implemented",
                    kind
                )))
            }
        };

        tracing::debug!(
            target: "recordstore::store",
            kind = %kind,
            "Created storage"
        );
        Ok(storage)
    }

    /// Suggest a strategy from expected record volume and write rate.
    pub fn recommend(expected_records: usize, writes_per_second: u32) -> Recommendation {
        if expected_records < 1_000 && writes_per_second < 10 {
            Recommendation {
                kind: StorageKind::SnapshotOnly,
                reason: "sufficient for small datasets",
            }
        } else if expected_records < 100_000 && writes_per_second < 100 {
            Recommendation {
                kind: StorageKind::WriteAheadLog,
                reason: "good balance for frequent updates",
            }
        } else if expected_records > 100_000 {
            Recommendation {
                kind: StorageKind::Database,
                reason: "required for large datasets",
            }
        } else {
            Recommendation {
                kind: StorageKind::WriteAheadLog,
                reason: "good default choice",
            }
        }
    }
}
