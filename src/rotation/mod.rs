//! Selection and retention engine
//!
//! Pure functions that decide which volumes are backed up, how snapshots are
//! named, and which snapshots fall out of the retention window. Nothing in
//! here talks to the provider.
//!
//! - `naming`: snapshot names and prefix ownership
//! - `selector`: volume filtering by configured names
//! - `retention`: oldest-first deletion planning

pub mod naming;
pub mod retention;
pub mod selector;

pub use naming::{filter_by_prefix, generate_snapshot_name, matches_prefix};
pub use retention::{plan_deletions, unparseable_timestamps};
pub use selector::select_volumes;
