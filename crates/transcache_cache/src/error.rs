//! Cache error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the cache tiers.
///
/// None of these are fatal to a build: the coordinator degrades a failed
/// filesystem read into a miss and a failed write into "skip persistence".
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to read a cache entry.
    #[error("Failed to read cache entry {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a cache entry.
    #[error("Failed to write cache entry {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A string was not a valid content hash.
    #[error("Invalid content hash: {0}")]
    InvalidHash(String),
}

impl CacheError {
    /// Creates a read error for the given entry path.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error for the given entry path.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
