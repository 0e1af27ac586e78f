//! Snapshot model
//!
//! Snapshots are created and deleted by this crate but never mutated. The
//! creation time is kept exactly as the provider returned it so that a
//! malformed value can be reported instead of silently rewritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of a volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Provider-assigned identifier
    pub id: String,

    /// Snapshot name
    pub name: String,

    /// Identifier of the volume this snapshot was taken from
    #[serde(default)]
    pub resource_id: String,

    /// Creation time as an RFC 3339 string
    pub created_at: String,

    /// Size of the source volume at snapshot time
    #[serde(default)]
    pub size_gigabytes: f64,
}

impl Snapshot {
    /// Create a snapshot record
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resource_id: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_id: resource_id.into(),
            created_at: created_at.into(),
            size_gigabytes: 0.0,
        }
    }

    /// Parsed creation time, or `None` if the provider value is not RFC 3339
    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
