//! Custom error types for snapshot-rotate
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Rate-limit metadata reported by the provider alongside a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimit {
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// Unix timestamp at which the window resets
    pub reset: i64,
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} remaining, resets at {}",
            self.remaining, self.limit, self.reset
        )
    }
}

/// A failed call against the storage provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// Provider operation that failed (e.g. "CreateSnapshot")
    pub operation: &'static str,
    /// Human-readable message
    pub message: String,
    /// HTTP status, when the request reached the provider
    pub status: Option<u16>,
    /// Rate-limit headers from the failing response
    pub rate_limit: Option<RateLimit>,
}

impl ProviderError {
    /// Create a provider error with no status or rate-limit detail
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            status: None,
            rate_limit: None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed", self.operation)?;
        if let Some(status) = self.status {
            write!(f, " ({})", status)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ProviderError {}

/// The main error type for snapshot-rotate operations
#[derive(Error, Debug)]
pub enum RotateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Access token could not be obtained
    #[error("Credential error: {0}")]
    Credential(String),

    /// Storage provider rejected or failed a request
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),
}

impl RotateError {
    /// Rate-limit detail, if this error came from a provider response
    pub fn rate_limit(&self) -> Option<RateLimit> {
        match self {
            Self::Provider(err) => err.rate_limit,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RotateError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type alias for snapshot-rotate operations
pub type RotateResult<T> = Result<T, RotateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RotateError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_provider_error_display() {
        let err: RotateError = ProviderError {
            operation: "DeleteSnapshot",
            message: "snapshot is in use".into(),
            status: Some(422),
            rate_limit: None,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Provider error: DeleteSnapshot failed (422): snapshot is in use"
        );
        assert!(matches!(err, RotateError::Provider(_)));
    }

    #[test]
    fn test_rate_limit_exposed() {
        let limit = RateLimit {
            limit: 5000,
            remaining: 0,
            reset: 1_700_000_000,
        };
        let mut provider = ProviderError::new("ListVolumes", "too many requests");
        provider.rate_limit = Some(limit);
        let err = RotateError::from(provider);

        assert_eq!(err.rate_limit(), Some(limit));
        assert_eq!(limit.to_string(), "0/5000 remaining, resets at 1700000000");
        assert!(RotateError::Http("boom".into()).rate_limit().is_none());
    }
}
