//! Error types for deepwatch

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the entry points, path parsing and loaders
#[derive(Debug, Error)]
pub enum WatchError {
    /// A caller-supplied argument cannot be used
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An access path could not be parsed
    #[error("Invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Reading a source or config file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension is not one of json, yaml, yml
    #[error("Unsupported source format: {0}")]
    UnsupportedFormat(String),
}

impl WatchError {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        WatchError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;
