//! Storage provider abstraction
//!
//! The orchestrator only needs four operations from the remote API. They are
//! expressed as a trait so a scripted test double can stand in for the real
//! HTTP client.
//!
//! Every call is synchronous and returns either a result or an error; no call
//! is retried here.

pub mod digitalocean;
#[cfg(test)]
pub mod fake;

use crate::error::RotateResult;
use crate::models::{Snapshot, Volume};

pub use digitalocean::DigitalOceanClient;

/// Operations the backup run needs from the block-storage provider
pub trait StorageProvider {
    /// List every volume in the account
    fn list_volumes(&self) -> RotateResult<Vec<Volume>>;

    /// Snapshot a volume under the given name
    fn create_snapshot(&self, volume_id: &str, name: &str) -> RotateResult<Snapshot>;

    /// List all snapshots of a volume
    fn list_snapshots(&self, volume_id: &str) -> RotateResult<Vec<Snapshot>>;

    /// Delete a snapshot
    fn delete_snapshot(&self, snapshot_id: &str) -> RotateResult<()>;
}

impl<P: StorageProvider + ?Sized> StorageProvider for &P {
    fn list_volumes(&self) -> RotateResult<Vec<Volume>> {
        (**self).list_volumes()
    }

    fn create_snapshot(&self, volume_id: &str, name: &str) -> RotateResult<Snapshot> {
        (**self).create_snapshot(volume_id, name)
    }

    fn list_snapshots(&self, volume_id: &str) -> RotateResult<Vec<Snapshot>> {
        (**self).list_snapshots(volume_id)
    }

    fn delete_snapshot(&self, snapshot_id: &str) -> RotateResult<()> {
        (**self).delete_snapshot(snapshot_id)
    }
}
