//! recordstore - write-ahead-log backed record store
//!
//! Durably persists collections of records that have an integer identity
//! and a serde representation. Mutations are appended to a JSON-lines log
//! before they touch the in-memory index; the log is periodically folded
//! into a JSON snapshot.
//!
//! # Quick Start
//!
//! ```no_run
//! use recordstore::{Record, RecordId, StoreConfig, WalStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Student {
//!     id: RecordId,
//!     name: String,
//! }
//!
//! impl Record for Student {
//!     fn id(&self) -> RecordId {
//!         self.id
//!     }
//! }
//!
//! # fn main() -> recordstore::StoreResult<()> {
//! let mut store = WalStore::open("students.json", StoreConfig::default())?;
//! store.insert(Student { id: 1, name: "Ann".into() })?;
//! assert_eq!(store.load_by_id(1)?.name, "Ann");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `recordstore-core`: the [`Record`] contract and [`StoreError`]
//! - `recordstore-durability`: log frames, log reader/writer, snapshot file
//! - `recordstore-engine`: index, recovery, compaction and the stores

pub use recordstore_core::{Record, RecordId, StoreError, StoreResult};
pub use recordstore_durability::{DurabilityMode, OpKind, Operation, ReplayMode, StorePaths};
pub use recordstore_engine::{
    CompactInfo, CompactTrigger, Recommendation, RecordStorage, ReplayStats, SnapshotStore,
    StorageFactory, StorageKind, StoreConfig, StoreState, WalStore,
};
