//! Store configuration
//!
//! Built in code with the builder methods, or read from a TOML file:
//!
//! ```toml
//! # Operations between automatic compactions
//! compact_threshold = 50
//!
//! # "permissive" (skip unreadable log frames) or "strict"
//! replay_mode = "permissive"
//!
//! # "always" (fsync every append) or "buffered"
//! durability = "always"
//! ```

use recordstore_core::{StoreError, StoreResult};
use recordstore_durability::{DurabilityMode, ReplayMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of logged operations between automatic compactions
pub const DEFAULT_COMPACT_THRESHOLD: usize = 50;

/// Configuration for a WAL-backed store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Logged operations between automatic compactions (must be positive)
    pub compact_threshold: usize,
    /// How replay treats log frames that fail to decode
    pub replay_mode: ReplayMode,
    /// fsync policy for log appends
    pub durability: DurabilityMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
            replay_mode: ReplayMode::Permissive,
            durability: DurabilityMode::Always,
        }
    }
}

impl StoreConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration for testing (compacts every 4 operations).
    pub fn for_testing() -> Self {
        StoreConfig {
            compact_threshold: 4,
            ..Self::default()
        }
    }

    /// Set compaction threshold (builder pattern).
    pub fn with_compact_threshold(mut self, threshold: usize) -> Self {
        self.compact_threshold = threshold;
        self
    }

    /// Set replay mode (builder pattern).
    pub fn with_replay_mode(mut self, mode: ReplayMode) -> Self {
        self.replay_mode = mode;
        self
    }

    /// Set durability mode (builder pattern).
    pub fn with_durability(mut self, mode: DurabilityMode) -> Self {
        self.durability = mode;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.compact_threshold == 0 {
            return Err(StoreError::InvalidConfig(
                "compact_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> StoreResult<Self> {
        let config: StoreConfig =
            toml::from_str(content).map_err(|e| StoreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            StoreError::InvalidConfig(detail) => {
                StoreError::InvalidConfig(format!("{}: {}", path.display(), detail))
            }
            other => other,
        })
    }
}
