//! Durability and replay mode configuration
//!
//! Controls WAL sync behavior (Always, Buffered) and how replay treats
//! frames that fail to decode (Permissive, Strict).

use serde::{Deserialize, Serialize};

/// Durability mode for WAL appends
///
/// # Modes
///
/// | Mode | fsync | Data Loss Window |
/// |------|-------|-----------------|
/// | Always | Every append | Zero |
/// | Buffered | Never on append | Whatever the OS had not flushed |
///
/// Compaction always fsyncs the new snapshot and the truncated log,
/// regardless of mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurabilityMode {
    /// fsync after every append (the default)
    ///
    /// A mutation is durable once the call that appended it returns.
    #[default]
    Always,

    /// Write and flush to the OS, skip the fsync
    ///
    /// Survives a process crash but not a power loss.
    Buffered,
}

impl DurabilityMode {
    /// Check if this mode requires an fsync on every append
    pub fn requires_immediate_fsync(&self) -> bool {
        matches!(self, DurabilityMode::Always)
    }

    /// Human-readable description of the mode
    pub fn description(&self) -> &'static str {
        match self {
            DurabilityMode::Always => "Always sync (safest, slowest)",
            DurabilityMode::Buffered => "Buffered (survives process crash, not power loss)",
        }
    }
}

/// How log replay treats a frame that cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayMode {
    /// Skip the frame, log a warning and keep replaying (the default)
    #[default]
    Permissive,

    /// Fail replay on the first malformed frame
    Strict,
}

impl ReplayMode {
    /// Whether a malformed frame aborts replay
    pub fn is_strict(&self) -> bool {
        matches!(self, ReplayMode::Strict)
    }
}
