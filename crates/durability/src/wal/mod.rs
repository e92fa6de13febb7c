//! WAL (Write-Ahead Log) module
//!
//! - `frame`: one JSON line per operation (Operation, OpKind, FrameError)
//! - `mode`: durability and replay modes
//! - `writer`: append-only log writer (LogWriter)
//! - `reader`: log reader for replay (LogReader)

pub mod frame;
pub mod mode;
pub mod reader;
pub mod writer;

pub use frame::{now_secs, FrameError, OpKind, Operation};
pub use mode::{DurabilityMode, ReplayMode};
pub use reader::{LogReadResult, LogReader, SkippedFrame, TornTail};
pub use writer::{LogWriter, WalCounters};
