//! snapshot-rotate - Policy-driven rotation of block-storage snapshots
//!
//! Each run snapshots a set of volumes on the storage provider and then trims
//! every volume's managed snapshots down to a maximum count, oldest first.
//! No state is kept between runs; every decision is re-derived from the
//! provider's current listing.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Environment-backed settings and access token handling
//! - `error`: Custom error types
//! - `models`: Volumes, snapshots and the retention policy
//! - `rotation`: Naming scheme, volume selection and retention planning
//! - `provider`: Storage provider trait and the DigitalOcean client
//! - `backup`: Run orchestration, per-volume state machine and events
//! - `display`: End-of-run summary formatting
//! - `logging`: Tracing subscriber setup for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use snapshot_rotate::backup::{BackupOrchestrator, TracingSink};
//! use snapshot_rotate::provider::DigitalOceanClient;
//!
//! let client = DigitalOceanClient::new(&settings.api_url, settings.token_source())?;
//! let orchestrator = BackupOrchestrator::new(
//!     client,
//!     TracingSink,
//!     settings.retention_policy(),
//!     settings.wanted_volumes(),
//! );
//! let report = orchestrator.run(chrono::Utc::now())?;
//! ```

pub mod backup;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod provider;
pub mod rotation;

pub use error::{RotateError, RotateResult};
