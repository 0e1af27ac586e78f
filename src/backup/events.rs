//! Observability records emitted during a run
//!
//! The orchestrator reports progress through an injected `EventSink` rather
//! than a global logger. `TracingSink` forwards events to `tracing` with
//! structured fields; tests substitute a recorder.

use serde::Serialize;

use super::state::VolumeStep;
use crate::error::RateLimit;

/// Everything the orchestrator reports
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BackupEvent {
    RunStarted {
        volumes_wanted: Vec<String>,
        max_snapshots_to_keep: usize,
        prefix: String,
        dry_run: bool,
    },
    RunAborted {
        error: String,
        rate_limit: Option<RateLimit>,
    },
    VolumesDiscovered {
        count: usize,
        names: Vec<String>,
    },
    VolumesSelected {
        count: usize,
        names: Vec<String>,
        wanted: Vec<String>,
    },
    SnapshotSkipped {
        volume_id: String,
        volume_name: String,
        snapshot_name: String,
    },
    SnapshotCreating {
        volume_id: String,
        volume_name: String,
        snapshot_name: String,
    },
    SnapshotCreated {
        volume_id: String,
        volume_name: String,
        snapshot_id: String,
        snapshot_name: String,
    },
    SnapshotsListing {
        volume_id: String,
        volume_name: String,
    },
    SnapshotsListed {
        volume_id: String,
        count: usize,
        names: Vec<String>,
    },
    SnapshotsFiltered {
        volume_id: String,
        prefix: String,
        count: usize,
        names: Vec<String>,
    },
    UnparseableTimestamp {
        volume_id: String,
        snapshot_id: String,
        snapshot_name: String,
        value: String,
    },
    MarkedForDeletion {
        volume_id: String,
        max_snapshots_to_keep: usize,
        count: usize,
        names: Vec<String>,
    },
    SnapshotDeleting {
        volume_id: String,
        snapshot_id: String,
        snapshot_name: String,
    },
    SnapshotDeleted {
        volume_id: String,
        snapshot_id: String,
        snapshot_name: String,
    },
    DeletionFailed {
        volume_id: String,
        snapshot_id: String,
        snapshot_name: String,
        error: String,
        rate_limit: Option<RateLimit>,
    },
    StepFailed {
        volume_id: String,
        volume_name: String,
        step: VolumeStep,
        error: String,
        rate_limit: Option<RateLimit>,
    },
    VolumeFinished {
        volume_id: String,
        volume_name: String,
        failed: bool,
        deleted: usize,
        failed_deletions: usize,
    },
    RunFinished {
        volumes: usize,
        failed_volumes: usize,
        snapshots_created: usize,
        snapshots_deleted: usize,
        failed_deletions: usize,
    },
}

/// Receives observability records
pub trait EventSink {
    fn emit(&self, event: BackupEvent);
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn emit(&self, event: BackupEvent) {
        (**self).emit(event)
    }
}

/// Forwards events to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: BackupEvent) {
        use tracing::{error, info, warn};

        match event {
            BackupEvent::RunStarted {
                volumes_wanted,
                max_snapshots_to_keep,
                prefix,
                dry_run,
            } => info!(
                volumes_wanted = ?volumes_wanted,
                max_snapshots_to_keep,
                prefix = %prefix,
                dry_run,
                "Volumes backup begin"
            ),
            BackupEvent::RunAborted { error, rate_limit } => error!(
                error = %error,
                rate_limit = ?rate_limit,
                "Could not list volumes, aborting run"
            ),
            BackupEvent::VolumesDiscovered { count, names } => {
                info!(volumes_number = count, volumes_names = ?names, "Existing volumes")
            }
            BackupEvent::VolumesSelected {
                count,
                names,
                wanted,
            } => info!(
                volumes_number = count,
                volumes_names = ?names,
                volumes_needed = ?wanted,
                "Filtered volumes"
            ),
            BackupEvent::SnapshotSkipped {
                volume_id,
                volume_name,
                snapshot_name,
            } => info!(
                volume_id = %volume_id,
                volume_name = %volume_name,
                snapshot_name = %snapshot_name,
                "Dry run, not creating snapshot"
            ),
            BackupEvent::SnapshotCreating {
                volume_id,
                volume_name,
                snapshot_name,
            } => info!(
                volume_id = %volume_id,
                volume_name = %volume_name,
                snapshot_name = %snapshot_name,
                "Creating snapshot"
            ),
            BackupEvent::SnapshotCreated {
                volume_id,
                volume_name,
                snapshot_id,
                snapshot_name,
            } => info!(
                volume_id = %volume_id,
                volume_name = %volume_name,
                snapshot_id = %snapshot_id,
                snapshot_name = %snapshot_name,
                "Snapshot has been created"
            ),
            BackupEvent::SnapshotsListing {
                volume_id,
                volume_name,
            } => info!(
                volume_id = %volume_id,
                volume_name = %volume_name,
                "Listing snapshots of volume"
            ),
            BackupEvent::SnapshotsListed {
                volume_id,
                count,
                names,
            } => info!(
                volume_id = %volume_id,
                snapshots_number = count,
                snapshots_names = ?names,
                "Existing snapshots of volume"
            ),
            BackupEvent::SnapshotsFiltered {
                volume_id,
                prefix,
                count,
                names,
            } => info!(
                volume_id = %volume_id,
                snapshot_prefix = %prefix,
                snapshots_number = count,
                snapshots_names = ?names,
                "Filtered snapshots of volume by prefix"
            ),
            BackupEvent::UnparseableTimestamp {
                volume_id,
                snapshot_id,
                snapshot_name,
                value,
            } => warn!(
                volume_id = %volume_id,
                snapshot_id = %snapshot_id,
                snapshot_name = %snapshot_name,
                created_at = %value,
                "Unparseable creation time, treating snapshot as oldest"
            ),
            BackupEvent::MarkedForDeletion {
                volume_id,
                max_snapshots_to_keep,
                count,
                names,
            } => info!(
                volume_id = %volume_id,
                max_snapshots_to_keep,
                snapshots_number = count,
                snapshots_names = ?names,
                "Removing old snapshots"
            ),
            BackupEvent::SnapshotDeleting {
                volume_id,
                snapshot_id,
                snapshot_name,
            } => info!(
                volume_id = %volume_id,
                snapshot_id = %snapshot_id,
                snapshot_name = %snapshot_name,
                "Deleting snapshot"
            ),
            BackupEvent::SnapshotDeleted {
                volume_id,
                snapshot_id,
                snapshot_name,
            } => info!(
                volume_id = %volume_id,
                snapshot_id = %snapshot_id,
                snapshot_name = %snapshot_name,
                "Snapshot has been deleted"
            ),
            BackupEvent::DeletionFailed {
                volume_id,
                snapshot_id,
                snapshot_name,
                error,
                rate_limit,
            } => error!(
                volume_id = %volume_id,
                snapshot_id = %snapshot_id,
                snapshot_name = %snapshot_name,
                error = %error,
                rate_limit = ?rate_limit,
                "Failed to delete snapshot"
            ),
            BackupEvent::StepFailed {
                volume_id,
                volume_name,
                step,
                error,
                rate_limit,
            } => error!(
                volume_id = %volume_id,
                volume_name = %volume_name,
                step = %step,
                error = %error,
                rate_limit = ?rate_limit,
                "Volume step failed, skipping volume"
            ),
            BackupEvent::VolumeFinished {
                volume_id,
                volume_name,
                failed,
                deleted,
                failed_deletions,
            } => info!(
                volume_id = %volume_id,
                volume_name = %volume_name,
                failed,
                deleted,
                failed_deletions,
                "Volume done"
            ),
            BackupEvent::RunFinished {
                volumes,
                failed_volumes,
                snapshots_created,
                snapshots_deleted,
                failed_deletions,
            } => info!(
                volumes,
                failed_volumes,
                snapshots_created,
                snapshots_deleted,
                failed_deletions,
                "Volumes backup is over"
            ),
        }
    }
}
