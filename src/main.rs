use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use snapshot_rotate::backup::{BackupOrchestrator, TracingSink};
use snapshot_rotate::config::Settings;
use snapshot_rotate::display::format_run_report;
use snapshot_rotate::logging::init_tracing;
use snapshot_rotate::provider::DigitalOceanClient;

fn main() -> Result<()> {
    let settings = Settings::parse();

    init_tracing(settings.log_format);
    settings.validate()?;

    let client = DigitalOceanClient::new(settings.api_url.clone(), settings.token_source())?;

    let orchestrator = BackupOrchestrator::new(
        client,
        TracingSink,
        settings.retention_policy(),
        settings.wanted_volumes(),
    )
    .with_dry_run(settings.dry_run);

    // Only a failed volume listing aborts; per-volume failures are in the report
    let report = orchestrator
        .run(Utc::now())
        .context("Volumes backup aborted")?;

    print!("{}", format_run_report(&report));

    if !report.is_clean() {
        tracing::warn!(
            failed_volumes = report.failed_volumes(),
            failed_deletions = report.failed_deletions(),
            "Run finished with failures; they will be retried on the next run"
        );
    }

    Ok(())
}
