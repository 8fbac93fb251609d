//! Hit and miss counters for one build session.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Lock-free counters updated by the coordinator.
#[derive(Debug, Default)]
pub(crate) struct CacheStats {
    memory_hits: AtomicU64,
    filesystem_hits: AtomicU64,
    stale: AtomicU64,
    misses: AtomicU64,
    bypassed: AtomicU64,
    write_failures: AtomicU64,
}

impl CacheStats {
    pub(crate) fn memory_hit(&self) {
        self.memory_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn filesystem_hit(&self) {
        self.filesystem_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A memory entry existed but its mtime no longer matched. Also counted as a miss.
    pub(crate) fn stale(&self) {
        self.stale.fetch_add(1, Ordering::Relaxed);
        self.miss();
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn bypassed(&self) {
        self.bypassed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            filesystem_hits: self.filesystem_hits.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            bypassed: self.bypassed.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the coordinator counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    pub memory_hits: u64,
    pub filesystem_hits: u64,
    /// Lookups that found an outdated memory entry (included in `misses`).
    pub stale: u64,
    pub misses: u64,
    /// Lookups made while caching was disabled.
    pub bypassed: u64,
    /// Filesystem tier writes that failed and were skipped.
    pub write_failures: u64,
}

impl CacheStatsSnapshot {
    /// Total number of lookups served from either tier.
    pub fn hits(&self) -> u64 {
        self.memory_hits + self.filesystem_hits
    }
}
