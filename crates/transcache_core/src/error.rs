//! Coordinator error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the caller of a file load.
///
/// Cache tier failures are not in this list: they degrade to a miss or to
/// skipped persistence and are only logged.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source file could not be opened, stat'ed, or read.
    #[error("Failed to read source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The path handed to the coordinator failed boundary validation.
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// A store was attempted for a miss that carries no hash.
    #[error("Cannot store {path}: no content hash (caching disabled or not a miss)")]
    MissingHash { path: PathBuf },

    /// The external transformer failed.
    #[error("Transform failed for {path}: {message}")]
    Transform { path: PathBuf, message: String },
}

impl CoreError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a source read error.
    pub fn source_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceRead {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid path error.
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
