//! Runtime settings for snapshot-rotate
//!
//! Everything is read once at startup from the environment. Each variable
//! also has a command-line flag so a single run can override it.

use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};

use super::credentials::{AccessToken, StaticTokenSource};
use crate::error::{RotateError, RotateResult};
use crate::models::RetentionPolicy;

/// Default provider endpoint
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogFormat {
    /// Human-readable lines (default)
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Settings for a single rotation run
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snapshot-rotate",
    version,
    about = "Snapshot block-storage volumes and prune old snapshots",
    long_about = "Creates a timestamped snapshot of every selected volume, then \
                  deletes the oldest snapshots carrying the configured prefix until \
                  at most SNAPSHOTS_MAX remain per volume. Configure through \
                  environment variables; flags override them."
)]
pub struct Settings {
    /// API access token
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true, value_parser = parse_token)]
    pub access_token: AccessToken,

    /// Comma-separated volume names to back up (empty = all volumes)
    #[arg(long = "volumes", env = "VOLUMES_BACKUP", value_delimiter = ',')]
    pub volumes_backup: Vec<String>,

    /// Maximum number of prefixed snapshots to keep per volume
    #[arg(long = "max-snapshots", env = "SNAPSHOTS_MAX", default_value_t = 7)]
    pub snapshots_max: usize,

    /// Prefix for created snapshot names; only snapshots with it are pruned
    #[arg(long = "prefix", env = "SNAPSHOTS_PREFIX", default_value = "auto")]
    pub snapshots_prefix: String,

    /// Provider API base URL
    #[arg(long, env = "DIGITALOCEAN_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Plan deletions without creating or deleting anything
    #[arg(long, env = "DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,
}

fn parse_token(value: &str) -> Result<AccessToken, String> {
    Ok(AccessToken::new(value))
}

impl Settings {
    /// Check that the settings describe a runnable job
    pub fn validate(&self) -> RotateResult<()> {
        if self.access_token.is_blank() {
            return Err(RotateError::Config("ACCESS_TOKEN is empty".into()));
        }
        if self.api_url.trim().is_empty() {
            return Err(RotateError::Config("API URL is empty".into()));
        }
        self.retention_policy().validate()
    }

    /// Volume names to restrict the run to, with blanks dropped
    pub fn wanted_volumes(&self) -> Vec<String> {
        self.volumes_backup
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Retention policy derived from the settings
    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy::new(self.snapshots_max, self.snapshots_prefix.clone())
    }

    /// Token source serving the configured access token
    pub fn token_source(&self) -> StaticTokenSource {
        StaticTokenSource::new(self.access_token.clone())
    }
}
