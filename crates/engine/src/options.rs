//! Traversal options.

use vardump_core::{DumpError, DumpResult};

/// Default maximum first-visit nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Traversal parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumperOptions {
    /// Maximum nesting of composites on their first visit (default: 512).
    ///
    /// A root array is at depth 1. Shared and cyclic structure does not add
    /// depth because repeats are emitted as references.
    pub max_depth: usize,
}

impl Default for DumperOptions {
    fn default() -> Self {
        DumperOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DumperOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum depth (builder pattern).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate options.
    pub fn validate(&self) -> DumpResult<()> {
        if self.max_depth == 0 {
            return Err(DumpError::config("max_depth must be at least 1"));
        }
        Ok(())
    }
}
