//! Configuration for mapmsg
//!
//! Per-message settings with sensible defaults. A nested view inherits the
//! config of the message it was extracted from.

use crate::codec::DEFAULT_MAX_DEPTH;

/// Settings shared by build and read mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Build Mode
    // -------------------------------------------------------------------------
    /// Bytes reserved for the output buffer when a build-mode message is created
    pub initial_capacity: usize,

    /// Verify that every map receives exactly the number of entries its
    /// header declared. Violations fail with `InvalidState` instead of
    /// producing a malformed document.
    pub track_entry_counts: bool,

    // -------------------------------------------------------------------------
    // Read Mode
    // -------------------------------------------------------------------------
    /// Deepest container nesting accepted by parse (root map is depth 1),
    /// clamped to [`MAX_DEPTH_LIMIT`](crate::codec::MAX_DEPTH_LIMIT)
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            track_entry_counts: cfg!(debug_assertions),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the initial output buffer capacity (in bytes)
    pub fn initial_capacity(mut self, bytes: usize) -> Self {
        self.config.initial_capacity = bytes;
        self
    }

    /// Enable or disable declared entry count verification
    pub fn track_entry_counts(mut self, enabled: bool) -> Self {
        self.config.track_entry_counts = enabled;
        self
    }

    /// Set the maximum nesting depth accepted by parse
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
