//! Durability layer for recordstore
//!
//! This crate handles everything that touches disk:
//!
//! - WAL: append-only JSON-lines operation log with one frame per mutation
//! - Durability modes: Always (fsync per append), Buffered
//! - Replay modes: Permissive (skip bad frames), Strict
//! - Snapshot: crash-safe JSON snapshot written with write-fsync-rename
//! - Paths: snapshot/log/temp file layout derived from one path

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod paths;
pub mod snapshot;
pub mod wal;

pub use error::{DurabilityError, DurabilityResult};
pub use paths::{StorePaths, LOG_SUFFIX, TEMP_SUFFIX};
pub use snapshot::{SnapshotFile, SnapshotInfo};
pub use wal::{
    now_secs, DurabilityMode, FrameError, LogReadResult, LogReader, LogWriter, OpKind, Operation,
    ReplayMode, SkippedFrame, TornTail, WalCounters,
};
