//! In-process memory tier.

use std::sync::Arc;

use dashmap::DashMap;

use crate::CacheKey;

/// Last transform result recorded for a file and platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCacheEntry {
    /// Transformed text.
    pub data: Arc<str>,
    /// Modification time (signed epoch millis) of the source the text was produced from.
    pub modified_at: i64,
}

impl MemoryCacheEntry {
    pub fn new(data: impl Into<Arc<str>>, modified_at: i64) -> Self {
        Self {
            data: data.into(),
            modified_at,
        }
    }

    /// Returns true if this entry was produced from a file with the given mtime.
    pub fn is_fresh(&self, modified_at: i64) -> bool {
        self.modified_at == modified_at
    }
}

/// Process-lifetime map from [`CacheKey`] to [`MemoryCacheEntry`].
///
/// A write replaces the whole entry under its shard lock, so readers never
/// see a partially updated entry and writers of different keys rarely
/// contend. There is no eviction.
pub struct MemoryTier {
    entries: DashMap<CacheKey, MemoryCacheEntry>,
}

impl MemoryTier {
    /// Creates an empty memory tier.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the entry for `key`, if any.
    pub fn read(&self, key: &CacheKey) -> Option<MemoryCacheEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Stores `entry` for `key`, replacing any previous entry.
    pub fn write(&self, key: CacheKey, entry: MemoryCacheEntry) {
        self.entries.insert(key, entry);
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tier holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new()
    }
}
