//! Snapshot-only record store
//!
//! Rewrites the whole file on every save. There is no log and nothing to
//! replay; the file is the collection. Suited to small, rarely written
//! collections.

use recordstore_core::{Record, StoreResult};
use recordstore_durability::{SnapshotFile, StorePaths};
use std::marker::PhantomData;
use std::path::Path;

/// Store that keeps records in a single snapshot file
pub struct SnapshotStore<T> {
    snapshot: SnapshotFile,
    _record: PhantomData<T>,
}

impl<T: Record> SnapshotStore<T> {
    /// Create a store over `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl AsRef<Path>) -> Self {
        SnapshotStore {
            snapshot: SnapshotFile::new(StorePaths::new(path)),
            _record: PhantomData,
        }
    }

    /// Replace the file content with `items`, in the given order.
    pub fn save(&self, items: &[T]) -> StoreResult<()> {
        let info = self.snapshot.write(items)?;
        tracing::debug!(
            target: "recordstore::store",
            path = %info.path.display(),
            records = info.records,
            "Snapshot store saved"
        );
        Ok(())
    }

    /// Read every record. A missing file reads as empty.
    pub fn load(&self) -> StoreResult<Vec<T>> {
        Ok(self.snapshot.read()?)
    }

    /// Write an empty collection.
    pub fn clear(&self) -> StoreResult<()> {
        self.save(&[])
    }

    /// File path
    pub fn path(&self) -> &Path {
        self.snapshot.path()
    }
}
