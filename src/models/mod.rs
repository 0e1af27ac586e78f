//! Core data models for snapshot-rotate
//!
//! Volumes and snapshots mirror what the storage provider returns; the
//! retention policy is derived from configuration.

pub mod policy;
pub mod snapshot;
pub mod volume;

pub use policy::RetentionPolicy;
pub use snapshot::Snapshot;
pub use volume::Volume;
