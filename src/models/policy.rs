//! Retention policy
//!
//! How many snapshots to keep per volume and which prefix marks a snapshot
//! as managed by this tool.

use crate::error::{RotateError, RotateResult};

/// Per-volume retention settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Maximum number of prefixed snapshots kept per volume
    pub max_snapshots_to_keep: usize,

    /// Prefix used to name new snapshots and to recognize managed ones
    pub naming_prefix: String,
}

impl RetentionPolicy {
    /// Create a policy
    pub fn new(max_snapshots_to_keep: usize, naming_prefix: impl Into<String>) -> Self {
        Self {
            max_snapshots_to_keep,
            naming_prefix: naming_prefix.into(),
        }
    }

    /// Validate the policy
    ///
    /// An empty prefix would match every snapshot on the volume, including
    /// ones taken by hand, so it is rejected.
    pub fn validate(&self) -> RotateResult<()> {
        if self.naming_prefix.trim().is_empty() {
            return Err(RotateError::Config(
                "Snapshot prefix cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
