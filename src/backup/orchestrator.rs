//! Backup orchestrator
//!
//! Drives one run: list volumes, select the configured ones, then for each
//! volume in turn create a snapshot, list its snapshots, keep the managed
//! ones, plan retention and delete the overflow.
//!
//! Only the initial volume listing can fail the run. Everything after that is
//! handled per volume (create/list failures) or per snapshot (delete
//! failures), reported through the event sink, and never retried in-process.

use chrono::{DateTime, Utc};

use super::events::{BackupEvent, EventSink};
use super::state::{FailedDeletion, RunReport, StepFailure, VolumeReport, VolumeState, VolumeStep};
use crate::error::RotateResult;
use crate::models::{RetentionPolicy, Snapshot, Volume};
use crate::provider::StorageProvider;
use crate::rotation::{
    filter_by_prefix, generate_snapshot_name, plan_deletions, select_volumes,
    unparseable_timestamps,
};

/// Runs snapshot rotation against a storage provider
pub struct BackupOrchestrator<P, S> {
    provider: P,
    sink: S,
    policy: RetentionPolicy,
    wanted_volumes: Vec<String>,
    dry_run: bool,
}

fn names<'a>(items: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    items.into_iter().cloned().collect()
}

fn snapshot_names(snapshots: &[Snapshot]) -> Vec<String> {
    names(snapshots.iter().map(|s| &s.name))
}

impl<P: StorageProvider, S: EventSink> BackupOrchestrator<P, S> {
    /// Create an orchestrator
    ///
    /// An empty `wanted_volumes` selects every volume.
    pub fn new(provider: P, sink: S, policy: RetentionPolicy, wanted_volumes: Vec<String>) -> Self {
        Self {
            provider,
            sink,
            policy,
            wanted_volumes,
            dry_run: false,
        }
    }

    /// Plan only: skip snapshot creation and deletion
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute a full run
    ///
    /// `now` stamps every snapshot created in this run.
    ///
    /// # Errors
    ///
    /// Returns an error only if the volumes cannot be listed; no volume has
    /// been touched in that case.
    pub fn run(&self, now: DateTime<Utc>) -> RotateResult<RunReport> {
        self.sink.emit(BackupEvent::RunStarted {
            volumes_wanted: self.wanted_volumes.clone(),
            max_snapshots_to_keep: self.policy.max_snapshots_to_keep,
            prefix: self.policy.naming_prefix.clone(),
            dry_run: self.dry_run,
        });

        let all_volumes = match self.provider.list_volumes() {
            Ok(volumes) => volumes,
            Err(e) => {
                self.sink.emit(BackupEvent::RunAborted {
                    error: e.to_string(),
                    rate_limit: e.rate_limit(),
                });
                return Err(e);
            }
        };

        let volumes_discovered = all_volumes.len();
        self.sink.emit(BackupEvent::VolumesDiscovered {
            count: volumes_discovered,
            names: names(all_volumes.iter().map(|v| &v.name)),
        });

        let selected = select_volumes(all_volumes, &self.wanted_volumes);
        self.sink.emit(BackupEvent::VolumesSelected {
            count: selected.len(),
            names: names(selected.iter().map(|v| &v.name)),
            wanted: self.wanted_volumes.clone(),
        });

        let volumes = selected
            .iter()
            .map(|volume| self.process_volume(volume, now))
            .collect();

        let report = RunReport {
            started_at: now,
            dry_run: self.dry_run,
            volumes_discovered,
            volumes,
        };

        self.sink.emit(BackupEvent::RunFinished {
            volumes: report.volumes.len(),
            failed_volumes: report.failed_volumes(),
            snapshots_created: report.snapshots_created(),
            snapshots_deleted: report.snapshots_deleted(),
            failed_deletions: report.failed_deletions(),
        });

        Ok(report)
    }

    /// Run the state machine for one volume until it is done or failed
    pub fn process_volume(&self, volume: &Volume, now: DateTime<Utc>) -> VolumeReport {
        let mut report = VolumeReport::new(volume);
        let mut state = VolumeState::SnapshotCreate;

        while !state.is_terminal() {
            state = self.advance(volume, state, now, &mut report);
        }

        if let VolumeState::Failed(step, error) = state {
            self.sink.emit(BackupEvent::StepFailed {
                volume_id: volume.id.clone(),
                volume_name: volume.name.clone(),
                step,
                error: error.to_string(),
                rate_limit: error.rate_limit(),
            });
            report.failure = Some(StepFailure {
                step,
                error: error.to_string(),
            });
        }

        self.sink.emit(BackupEvent::VolumeFinished {
            volume_id: volume.id.clone(),
            volume_name: volume.name.clone(),
            failed: report.is_failed(),
            deleted: report.deleted.len(),
            failed_deletions: report.failed_deletions.len(),
        });

        report
    }

    /// Perform one transition
    pub fn advance(
        &self,
        volume: &Volume,
        state: VolumeState,
        now: DateTime<Utc>,
        report: &mut VolumeReport,
    ) -> VolumeState {
        match state {
            VolumeState::SnapshotCreate => self.create_snapshot(volume, now, report),
            VolumeState::SnapshotList => self.list_snapshots(volume),
            VolumeState::Filter(snapshots) => self.filter(volume, snapshots, report),
            VolumeState::PlanRetention(scoped) => self.plan(volume, scoped, report),
            VolumeState::Delete(planned) => self.delete(volume, planned, report),
            terminal @ (VolumeState::Done | VolumeState::Failed(..)) => terminal,
        }
    }

    fn create_snapshot(
        &self,
        volume: &Volume,
        now: DateTime<Utc>,
        report: &mut VolumeReport,
    ) -> VolumeState {
        let snapshot_name = generate_snapshot_name(&self.policy.naming_prefix, &volume.name, now);

        if self.dry_run {
            self.sink.emit(BackupEvent::SnapshotSkipped {
                volume_id: volume.id.clone(),
                volume_name: volume.name.clone(),
                snapshot_name,
            });
            return VolumeState::SnapshotList;
        }

        self.sink.emit(BackupEvent::SnapshotCreating {
            volume_id: volume.id.clone(),
            volume_name: volume.name.clone(),
            snapshot_name: snapshot_name.clone(),
        });

        match self.provider.create_snapshot(&volume.id, &snapshot_name) {
            Ok(snapshot) => {
                self.sink.emit(BackupEvent::SnapshotCreated {
                    volume_id: volume.id.clone(),
                    volume_name: volume.name.clone(),
                    snapshot_id: snapshot.id.clone(),
                    snapshot_name: snapshot.name.clone(),
                });
                report.created = Some(snapshot);
                VolumeState::SnapshotList
            }
            Err(e) => VolumeState::Failed(VolumeStep::SnapshotCreate, e),
        }
    }

    fn list_snapshots(&self, volume: &Volume) -> VolumeState {
        self.sink.emit(BackupEvent::SnapshotsListing {
            volume_id: volume.id.clone(),
            volume_name: volume.name.clone(),
        });

        match self.provider.list_snapshots(&volume.id) {
            Ok(snapshots) => {
                self.sink.emit(BackupEvent::SnapshotsListed {
                    volume_id: volume.id.clone(),
                    count: snapshots.len(),
                    names: snapshot_names(&snapshots),
                });
                VolumeState::Filter(snapshots)
            }
            Err(e) => VolumeState::Failed(VolumeStep::SnapshotList, e),
        }
    }

    fn filter(&self, volume: &Volume, snapshots: Vec<Snapshot>, report: &mut VolumeReport) -> VolumeState {
        let prefix = &self.policy.naming_prefix;
        let scoped = filter_by_prefix(snapshots, prefix);

        self.sink.emit(BackupEvent::SnapshotsFiltered {
            volume_id: volume.id.clone(),
            prefix: prefix.clone(),
            count: scoped.len(),
            names: snapshot_names(&scoped),
        });

        report.scoped_count = scoped.len();
        VolumeState::PlanRetention(scoped)
    }

    fn plan(&self, volume: &Volume, scoped: Vec<Snapshot>, report: &mut VolumeReport) -> VolumeState {
        for snapshot in unparseable_timestamps(&scoped) {
            self.sink.emit(BackupEvent::UnparseableTimestamp {
                volume_id: volume.id.clone(),
                snapshot_id: snapshot.id.clone(),
                snapshot_name: snapshot.name.clone(),
                value: snapshot.created_at.clone(),
            });
        }

        let max = self.policy.max_snapshots_to_keep;
        let planned = plan_deletions(&scoped, max);
        if planned.is_empty() {
            return VolumeState::Done;
        }

        self.sink.emit(BackupEvent::MarkedForDeletion {
            volume_id: volume.id.clone(),
            max_snapshots_to_keep: max,
            count: planned.len(),
            names: snapshot_names(&planned),
        });

        report.planned = planned.clone();
        VolumeState::Delete(planned)
    }

    fn delete(&self, volume: &Volume, planned: Vec<Snapshot>, report: &mut VolumeReport) -> VolumeState {
        if self.dry_run {
            return VolumeState::Done;
        }

        for snapshot in planned {
            self.sink.emit(BackupEvent::SnapshotDeleting {
                volume_id: volume.id.clone(),
                snapshot_id: snapshot.id.clone(),
                snapshot_name: snapshot.name.clone(),
            });

            match self.provider.delete_snapshot(&snapshot.id) {
                Ok(()) => {
                    self.sink.emit(BackupEvent::SnapshotDeleted {
                        volume_id: volume.id.clone(),
                        snapshot_id: snapshot.id.clone(),
                        snapshot_name: snapshot.name.clone(),
                    });
                    report.deleted.push(snapshot);
                }
                Err(e) => {
                    self.sink.emit(BackupEvent::DeletionFailed {
                        volume_id: volume.id.clone(),
                        snapshot_id: snapshot.id.clone(),
                        snapshot_name: snapshot.name.clone(),
                        error: e.to_string(),
                        rate_limit: e.rate_limit(),
                    });
                    report.failed_deletions.push(FailedDeletion {
                        snapshot,
                        error: e.to_string(),
                    });
                }
            }
        }

        VolumeState::Done
    }
}
