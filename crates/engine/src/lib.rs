//! Storage engine for recordstore
//!
//! Builds the record stores on top of the durability layer:
//!
//! - `index`: ordered in-memory id → record map
//! - `recovery`: rebuilds the index from snapshot + log
//! - `compaction`: folds the log into a new snapshot
//! - `wal_store`: the WAL-backed store facade
//! - `snapshot_store`: the whole-file-rewrite store
//! - `strategy`: one bulk contract over both stores, plus the factory
//! - `config`: store configuration (code or TOML)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compaction;
pub mod config;
pub mod index;
pub mod recovery;
pub mod snapshot_store;
pub mod strategy;
pub mod wal_store;

pub use compaction::{CompactInfo, CompactTrigger, Compactor};
pub use config::{StoreConfig, DEFAULT_COMPACT_THRESHOLD};
pub use index::RecordIndex;
pub use recovery::{ReplayStats, Replayer};
pub use snapshot_store::SnapshotStore;
pub use strategy::{Recommendation, RecordStorage, StorageFactory, StorageKind};
pub use wal_store::{StoreState, WalStore};
