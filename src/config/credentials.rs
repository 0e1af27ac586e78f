//! Credential handling
//!
//! The access token is held in zeroizing memory and never printed. Callers
//! obtain it through a `TokenSource` so the HTTP layer does not care where
//! the secret came from.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{RotateError, RotateResult};

/// An API access token that zeros its contents on drop
#[derive(Clone)]
pub struct AccessToken {
    inner: Zeroizing<String>,
}

impl AccessToken {
    /// Create a new AccessToken
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(token.into()),
        }
    }

    /// Get the token contents
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Check if empty (ignoring surrounding whitespace)
    pub fn is_blank(&self) -> bool {
        self.inner.trim().is_empty()
    }
}

impl From<String> for AccessToken {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AccessToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("len", &self.inner.len())
            .finish()
    }
}

// Don't print the contents in Display output
impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

/// Supplies the token used to authenticate each provider request
pub trait TokenSource {
    /// The token to use right now
    fn current_token(&self) -> RotateResult<AccessToken>;
}

/// Serves the same token for the lifetime of the process
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: AccessToken,
}

impl StaticTokenSource {
    /// Create a source for a fixed token
    pub fn new(token: impl Into<AccessToken>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenSource for StaticTokenSource {
    fn current_token(&self) -> RotateResult<AccessToken> {
        if self.token.is_blank() {
            return Err(RotateError::Credential("Access token is empty".into()));
        }
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_exposes_contents() {
        let token = AccessToken::new("dop_v1_abc");
        assert_eq!(token.expose(), "dop_v1_abc");
    }

    #[test]
    fn test_token_redacted_in_output() {
        let token = AccessToken::new("dop_v1_secret");
        let debug = format!("{:?}", token);
        let display = format!("{}", token);

        assert!(!debug.contains("secret"));
        assert!(!display.contains("secret"));
        assert_eq!(display, "[REDACTED 13 bytes]");
    }

    #[test]
    fn test_static_source_returns_token() {
        let source = StaticTokenSource::new("dop_v1_abc");
        assert_eq!(source.current_token().unwrap().expose(), "dop_v1_abc");
    }

    #[test]
    fn test_static_source_rejects_blank() {
        let source = StaticTokenSource::new("   ");
        let err = source.current_token().unwrap_err();
        assert!(matches!(err, RotateError::Credential(_)));
    }
}
