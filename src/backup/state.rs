//! Per-volume state machine and run reports
//!
//! A volume moves through
//! `SnapshotCreate -> SnapshotList -> Filter -> PlanRetention -> Delete -> Done`.
//! A failed provider call in create or list ends the volume in `Failed`;
//! failed deletions are recorded without leaving the `Delete` state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::RotateError;
use crate::models::{Snapshot, Volume};

/// Named steps of the per-volume flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeStep {
    SnapshotCreate,
    SnapshotList,
    Filter,
    PlanRetention,
    Delete,
    Done,
}

impl fmt::Display for VolumeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VolumeStep::SnapshotCreate => "SnapshotCreate",
            VolumeStep::SnapshotList => "SnapshotList",
            VolumeStep::Filter => "Filter",
            VolumeStep::PlanRetention => "PlanRetention",
            VolumeStep::Delete => "Delete",
            VolumeStep::Done => "Done",
        };
        write!(f, "{}", name)
    }
}

/// Where a volume is in its flow, carrying the data the next step needs
#[derive(Debug)]
pub enum VolumeState {
    SnapshotCreate,
    SnapshotList,
    Filter(Vec<Snapshot>),
    PlanRetention(Vec<Snapshot>),
    Delete(Vec<Snapshot>),
    Done,
    Failed(VolumeStep, RotateError),
}

impl VolumeState {
    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, VolumeState::Done | VolumeState::Failed(..))
    }
}

/// A step that ended a volume's processing early
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    pub step: VolumeStep,
    pub error: String,
}

/// A planned deletion the provider refused
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedDeletion {
    pub snapshot: Snapshot,
    pub error: String,
}

/// What happened to one volume
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeReport {
    pub volume_id: String,
    pub volume_name: String,
    /// Snapshot created this run (none on failure or dry run)
    pub created: Option<Snapshot>,
    /// Managed snapshots found after creation
    pub scoped_count: usize,
    /// Snapshots selected for deletion
    pub planned: Vec<Snapshot>,
    /// Snapshots actually deleted
    pub deleted: Vec<Snapshot>,
    pub failed_deletions: Vec<FailedDeletion>,
    pub failure: Option<StepFailure>,
}

impl VolumeReport {
    /// Empty report for a volume about to be processed
    pub fn new(volume: &Volume) -> Self {
        Self {
            volume_id: volume.id.clone(),
            volume_name: volume.name.clone(),
            created: None,
            scoped_count: 0,
            planned: Vec::new(),
            deleted: Vec::new(),
            failed_deletions: Vec::new(),
            failure: None,
        }
    }

    /// Whether a create or list step failed
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    /// Volumes the provider listed before selection
    pub volumes_discovered: usize,
    /// One entry per selected volume, in processing order
    pub volumes: Vec<VolumeReport>,
}

impl RunReport {
    pub fn failed_volumes(&self) -> usize {
        self.volumes.iter().filter(|v| v.is_failed()).count()
    }

    pub fn snapshots_created(&self) -> usize {
        self.volumes.iter().filter(|v| v.created.is_some()).count()
    }

    pub fn snapshots_deleted(&self) -> usize {
        self.volumes.iter().map(|v| v.deleted.len()).sum()
    }

    pub fn failed_deletions(&self) -> usize {
        self.volumes.iter().map(|v| v.failed_deletions.len()).sum()
    }

    /// Whether every volume completed every step
    pub fn is_clean(&self) -> bool {
        self.failed_volumes() == 0 && self.failed_deletions() == 0
    }
}
