//! Configuration module for snapshot-rotate
//!
//! This module provides configuration management including:
//! - Environment-backed runtime settings
//! - Access token handling

pub mod credentials;
pub mod settings;

pub use credentials::{AccessToken, StaticTokenSource, TokenSource};
pub use settings::{LogFormat, Settings};
