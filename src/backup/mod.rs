//! Backup run orchestration
//!
//! - `BackupOrchestrator`: drives the per-volume create/list/prune flow
//! - `state`: the per-volume state machine and run reports
//! - `events`: observability records and the sinks that receive them
//!
//! # Example
//!
//! ```rust,ignore
//! use snapshot_rotate::backup::{BackupOrchestrator, TracingSink};
//!
//! let orchestrator = BackupOrchestrator::new(client, TracingSink, policy, wanted);
//! let report = orchestrator.run(chrono::Utc::now())?;
//! println!("{}", format_run_report(&report));
//! ```

mod events;
mod orchestrator;
mod state;

pub use events::{BackupEvent, EventSink, TracingSink};
pub use orchestrator::BackupOrchestrator;
pub use state::{FailedDeletion, RunReport, StepFailure, VolumeReport, VolumeState, VolumeStep};
