//! In-memory record index
//!
//! An ordered map from record id to the current record, plus the set of
//! ids deleted since the last compaction. Iteration is always ascending
//! by id so pagination is reproducible.

use recordstore_core::{Record, RecordId};
use recordstore_durability::{OpKind, Operation};
use std::collections::{BTreeMap, BTreeSet};

/// Ordered id → record map derived from snapshot + log
#[derive(Debug, Clone)]
pub struct RecordIndex<T> {
    records: BTreeMap<RecordId, T>,
    deleted: BTreeSet<RecordId>,
}

impl<T> Default for RecordIndex<T> {
    fn default() -> Self {
        RecordIndex {
            records: BTreeMap::new(),
            deleted: BTreeSet::new(),
        }
    }
}

impl<T: Record> RecordIndex<T> {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Load snapshot records. Later duplicates replace earlier ones.
    pub fn load_snapshot(&mut self, records: Vec<T>) {
        for record in records {
            self.records.insert(record.id(), record);
        }
    }

    /// Apply one logged operation.
    ///
    /// Insert/Update set the entry and clear the id from the deleted set;
    /// Delete removes the entry and records the id as deleted. An
    /// Insert/Update without a payload is ignored.
    pub fn apply(&mut self, op: Operation<T>) {
        match op.kind {
            OpKind::Insert | OpKind::Update => {
                if let Some(record) = op.data {
                    self.records.insert(op.id, record);
                    self.deleted.remove(&op.id);
                }
            }
            OpKind::Delete => {
                self.records.remove(&op.id);
                self.deleted.insert(op.id);
            }
        }
    }

    /// Record with this id
    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.records.get(&id)
    }

    /// Whether a record with this id is live
    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no live records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Live records in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    /// Up to `limit` records starting at the `offset`-th, ascending by id
    pub fn range(&self, offset: usize, limit: usize) -> Vec<T> {
        self.records
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Records for `ids` in the given order, silently omitting unknown ids
    pub fn get_many(&self, ids: &[RecordId]) -> Vec<T> {
        ids.iter()
            .filter_map(|id| self.records.get(id))
            .cloned()
            .collect()
    }

    /// Ids deleted since the last compaction
    pub fn deleted_ids(&self) -> &BTreeSet<RecordId> {
        &self.deleted
    }

    /// Forget deleted-id bookkeeping (done by compaction)
    pub fn clear_deleted(&mut self) {
        self.deleted.clear();
    }

    /// Replace the whole content with `records`
    pub fn replace_all(&mut self, records: Vec<T>) {
        self.clear();
        self.load_snapshot(records);
    }

    /// Drop all records and deleted-id bookkeeping
    pub fn clear(&mut self) {
        self.records.clear();
        self.deleted.clear();
    }
}
