//! Display formatting for terminal output
//!
//! Provides the end-of-run summary printed after the structured log.

pub mod report;

pub use report::format_run_report;
