//! Retention planning
//!
//! Given one volume's managed snapshots, pick the oldest ones beyond the
//! keep limit. Snapshots are ordered by creation time with a stable sort, so
//! equal timestamps keep the order the provider listed them in. A creation
//! time that does not parse sorts before every valid one, making that
//! snapshot the first deletion candidate.

use chrono::{DateTime, Utc};

use crate::models::Snapshot;

/// Snapshots to delete so that at most `max_to_keep` remain
///
/// Returns exactly `snapshots.len() - max_to_keep` entries, oldest first, or
/// nothing when the volume is within its limit.
pub fn plan_deletions(snapshots: &[Snapshot], max_to_keep: usize) -> Vec<Snapshot> {
    if snapshots.len() <= max_to_keep {
        return Vec::new();
    }

    let overflow = snapshots.len() - max_to_keep;

    let mut ordered: Vec<(Option<DateTime<Utc>>, &Snapshot)> =
        snapshots.iter().map(|s| (s.created_time(), s)).collect();
    // `None < Some(_)` puts unparseable timestamps first
    ordered.sort_by(|a, b| a.0.cmp(&b.0));

    ordered
        .into_iter()
        .take(overflow)
        .map(|(_, s)| s.clone())
        .collect()
}

/// Snapshots whose creation time cannot be parsed
pub fn unparseable_timestamps(snapshots: &[Snapshot]) -> Vec<&Snapshot> {
    snapshots
        .iter()
        .filter(|s| s.created_time().is_none())
        .collect()
}
