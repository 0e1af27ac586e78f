//! Scripted in-memory provider for tests
//!
//! Holds volumes and snapshots in memory, records every call, and can be told
//! to fail specific calls.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use super::StorageProvider;
use crate::error::{ProviderError, RotateResult};
use crate::models::{Snapshot, Volume};

/// One recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListVolumes,
    CreateSnapshot { volume_id: String, name: String },
    ListSnapshots { volume_id: String },
    DeleteSnapshot { snapshot_id: String },
}

impl Call {
    /// Volume or snapshot identifier the call targeted
    pub fn target(&self) -> Option<&str> {
        match self {
            Call::ListVolumes => None,
            Call::CreateSnapshot { volume_id, .. } | Call::ListSnapshots { volume_id } => {
                Some(volume_id.as_str())
            }
            Call::DeleteSnapshot { snapshot_id } => Some(snapshot_id.as_str()),
        }
    }
}

#[derive(Default)]
pub struct FakeProvider {
    volumes: Vec<Volume>,
    snapshots: RefCell<Vec<Snapshot>>,
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    /// Timestamp stamped on created snapshots
    pub created_at: String,
    pub fail_list_volumes: bool,
    pub fail_create: HashSet<String>,
    pub fail_list_snapshots: HashSet<String>,
    pub fail_delete: HashSet<String>,
}

impl FakeProvider {
    pub fn new(volumes: Vec<Volume>) -> Self {
        Self {
            volumes,
            created_at: "2030-01-01T00:00:00Z".into(),
            ..Default::default()
        }
    }

    pub fn with_snapshot(self, snapshot: Snapshot) -> Self {
        self.snapshots.borrow_mut().push(snapshot);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls that touched the given volume or snapshot
    pub fn calls_for(&self, target: &str) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.target() == Some(target))
            .cloned()
            .collect()
    }

    pub fn snapshots_of(&self, volume_id: &str) -> Vec<Snapshot> {
        self.snapshots
            .borrow()
            .iter()
            .filter(|s| s.resource_id == volume_id)
            .cloned()
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl StorageProvider for FakeProvider {
    fn list_volumes(&self) -> RotateResult<Vec<Volume>> {
        self.record(Call::ListVolumes);
        if self.fail_list_volumes {
            return Err(ProviderError::new("ListVolumes", "unauthorized").into());
        }
        Ok(self.volumes.clone())
    }

    fn create_snapshot(&self, volume_id: &str, name: &str) -> RotateResult<Snapshot> {
        self.record(Call::CreateSnapshot {
            volume_id: volume_id.to_string(),
            name: name.to_string(),
        });
        if self.fail_create.contains(volume_id) {
            return Err(ProviderError::new("CreateSnapshot", "volume busy").into());
        }

        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let snapshot = Snapshot::new(format!("new-{id}"), name, volume_id, self.created_at.clone());
        self.snapshots.borrow_mut().push(snapshot.clone());
        Ok(snapshot)
    }

    fn list_snapshots(&self, volume_id: &str) -> RotateResult<Vec<Snapshot>> {
        self.record(Call::ListSnapshots {
            volume_id: volume_id.to_string(),
        });
        if self.fail_list_snapshots.contains(volume_id) {
            return Err(ProviderError::new("ListSnapshots", "internal error").into());
        }
        Ok(self.snapshots_of(volume_id))
    }

    fn delete_snapshot(&self, snapshot_id: &str) -> RotateResult<()> {
        self.record(Call::DeleteSnapshot {
            snapshot_id: snapshot_id.to_string(),
        });
        if self.fail_delete.contains(snapshot_id) {
            return Err(ProviderError::new("DeleteSnapshot", "snapshot locked").into());
        }
        self.snapshots.borrow_mut().retain(|s| s.id != snapshot_id);
        Ok(())
    }
}
