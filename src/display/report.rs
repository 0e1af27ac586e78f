//! Run report formatting
//!
//! Renders the end-of-run summary table printed to stdout.

use crate::backup::{RunReport, VolumeReport};

/// Status column text for a volume
fn volume_status(volume: &VolumeReport) -> String {
    if let Some(failure) = &volume.failure {
        format!("failed at {}", failure.step)
    } else if !volume.failed_deletions.is_empty() {
        format!("{} deletion(s) failed", volume.failed_deletions.len())
    } else {
        "ok".to_string()
    }
}

/// Format a run report as a table with a totals line
pub fn format_run_report(report: &RunReport) -> String {
    let mut output = String::new();

    if report.dry_run {
        output.push_str("Dry run: nothing was created or deleted.\n");
    }

    if report.volumes.is_empty() {
        output.push_str(&format!(
            "No volumes selected ({} discovered).\n",
            report.volumes_discovered
        ));
        return output;
    }

    let name_width = report
        .volumes
        .iter()
        .map(|v| v.volume_name.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let deleted_header = if report.dry_run { "Would delete" } else { "Deleted" };

    // Header
    output.push_str(&format!(
        "{:<name_width$}  {:<40}  {:>7}  {:>12}  {}\n",
        "Volume",
        "Snapshot",
        "Managed",
        deleted_header,
        "Status",
        name_width = name_width,
    ));

    // Separator line
    output.push_str(&format!(
        "{:-<name_width$}  {:-<40}  {:->7}  {:->12}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for volume in &report.volumes {
        let snapshot = volume
            .created
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("-");
        let deleted = if report.dry_run {
            volume.planned.len()
        } else {
            volume.deleted.len()
        };

        output.push_str(&format!(
            "{:<name_width$}  {:<40}  {:>7}  {:>12}  {}\n",
            volume.volume_name,
            snapshot,
            volume.scoped_count,
            deleted,
            volume_status(volume),
            name_width = name_width,
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "{} of {} volume(s) processed, {} failed; {} snapshot(s) created, {} deleted, {} deletion(s) failed\n",
        report.volumes.len(),
        report.volumes_discovered,
        report.failed_volumes(),
        report.snapshots_created(),
        report.snapshots_deleted(),
        report.failed_deletions(),
    ));

    output
}
