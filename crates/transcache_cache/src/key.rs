//! Cache key types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::CacheError;

/// Identifies a memory tier slot: one per distinct file and platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    path: PathBuf,
    platform: Option<String>,
}

impl CacheKey {
    /// Creates a key for the given file path and target platform.
    pub fn new(path: impl Into<PathBuf>, platform: Option<&str>) -> Self {
        Self {
            path: path.into(),
            platform: platform.map(str::to_string),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.platform {
            Some(platform) => write!(f, "{} ({})", self.path.display(), platform),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// BLAKE3 digest over `(platform, config, path, mtime)`.
///
/// Addresses a filesystem tier entry and is handed from a miss to the
/// matching store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(blake3::Hash);

impl ContentHash {
    pub(crate) fn from_digest(hash: blake3::Hash) -> Self {
        Self(hash)
    }

    /// Returns the 64-character lowercase hex form.
    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.to_hex().as_str())
    }
}

impl FromStr for ContentHash {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        blake3::Hash::from_hex(s)
            .map(Self)
            .map_err(|_| CacheError::InvalidHash(s.to_string()))
    }
}
