//! Snapshot naming scheme
//!
//! Names have the form `{prefix}-{volume}-{YYYY.MM.DD.HH.MM.SS}`. The
//! timestamp sorts lexically and has one-second resolution, so two snapshots
//! of the same volume taken within the same second share a name (their
//! provider identifiers still differ).

use chrono::{DateTime, Utc};

use crate::models::Snapshot;

/// Timestamp layout embedded in snapshot names
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d.%H.%M.%S";

/// Separator between the name components
pub const SEPARATOR: char = '-';

/// Build the name for a new snapshot of `volume_name` taken at `timestamp`
pub fn generate_snapshot_name(prefix: &str, volume_name: &str, timestamp: DateTime<Utc>) -> String {
    format!(
        "{prefix}{SEPARATOR}{volume_name}{SEPARATOR}{}",
        timestamp.format(TIMESTAMP_FORMAT)
    )
}

/// Whether `snapshot_name` belongs to the rotation identified by `prefix`
///
/// The prefix must anchor at offset 0; a name that merely contains it is
/// not ours.
pub fn matches_prefix(snapshot_name: &str, prefix: &str) -> bool {
    snapshot_name.starts_with(prefix)
}

/// Keep only snapshots whose name carries `prefix`, preserving order
pub fn filter_by_prefix(snapshots: Vec<Snapshot>, prefix: &str) -> Vec<Snapshot> {
    snapshots
        .into_iter()
        .filter(|s| matches_prefix(&s.name, prefix))
        .collect()
}
