//! Structured error types for configuration loading and release lookups.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration files.
///
/// Every variant carries the offending path so the message can be shown to
/// the user as-is.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config file {} must contain a mapping at the top level, found {found}", .path.display())]
    NotAMapping { path: PathBuf, found: &'static str },

    #[error("config file {} has a non-finite number at '{key}'", .path.display())]
    NonFiniteNumber { path: PathBuf, key: String },

    #[error("config file {} cannot be represented as configuration: {source}", .path.display())]
    Convert {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Path of the file that caused the error.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::NotAMapping { path, .. }
            | ConfigError::NonFiniteNumber { path, .. }
            | ConfigError::Convert { path, .. } => path,
        }
    }
}

/// Errors raised by a release feed.
///
/// These never reach the end user: the update checker folds them into its
/// fallback record.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("release feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("release feed returned HTTP {status}")]
    Status { status: u16 },

    #[error("release feed timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("release feed unavailable: {0}")]
    Other(String),
}
