//! Two-tier lookup and write-through store.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};
use transcache_cache::{
    CacheKey, ContentHash, FilesystemTier, MemoryCacheEntry, MemoryTier, compute_hash,
};

use crate::single_flight::KeyLocks;
use crate::source::SourceFile;
use crate::stats::{CacheStats, CacheStatsSnapshot};
use crate::{CacheConfig, CoreError, ResolvedPath, TransformContext, Transformer};

/// The tier a cache hit was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    Memory,
    Filesystem,
}

/// Where the content of a completed load came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    Memory,
    Filesystem,
    /// The file was transformed during this load.
    Miss,
}

impl From<HitSource> for CacheSource {
    fn from(source: HitSource) -> Self {
        match source {
            HitSource::Memory => CacheSource::Memory,
            HitSource::Filesystem => CacheSource::Filesystem,
        }
    }
}

impl fmt::Display for CacheSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheSource::Memory => "memory",
            CacheSource::Filesystem => "filesystem",
            CacheSource::Miss => "miss",
        };
        f.write_str(name)
    }
}

/// Outcome of [`CacheCoordinator::lookup`].
#[derive(Debug)]
pub enum Lookup {
    /// Transformed text that is safe to serve as is.
    ///
    /// `hash` is the filesystem key the content was read under. A memory hit
    /// never computes one.
    Hit {
        content: Arc<str>,
        source: HitSource,
        hash: Option<ContentHash>,
    },
    /// The raw source, plus what is needed to store the result once transformed.
    Miss(Miss),
}

impl Lookup {
    pub fn source(&self) -> CacheSource {
        match self {
            Lookup::Hit { source, .. } => (*source).into(),
            Lookup::Miss(_) => CacheSource::Miss,
        }
    }
}

/// A cache miss, handed back to [`CacheCoordinator::store`] after transforming.
#[derive(Debug)]
pub struct Miss {
    /// Raw file content to transform.
    pub source_text: String,
    key: CacheKey,
    hash: Option<ContentHash>,
    modified_at: i64,
}

impl Miss {
    /// The hash to store under. `None` when caching is disabled.
    pub fn hash(&self) -> Option<&ContentHash> {
        self.hash.as_ref()
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Modification time observed at lookup.
    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }
}

/// Result of a complete [`CacheCoordinator::load`].
#[derive(Debug, Clone)]
pub struct Loaded {
    pub content: Arc<str>,
    pub source: CacheSource,
}

/// The one component a build pipeline talks to.
///
/// Create one per build session and share it by reference across all loads.
///
/// Per lookup: a fresh memory entry is served directly; a stale one sends the
/// lookup straight to a miss without consulting the filesystem tier (the new
/// hash cannot have been stored yet); with no memory entry at all, the content
/// hash is computed and the filesystem tier consulted, promoting any hit.
pub struct CacheCoordinator {
    memory: MemoryTier,
    filesystem: FilesystemTier,
    enabled: bool,
    single_flight: bool,
    key_locks: KeyLocks,
    stats: CacheStats,
}

impl CacheCoordinator {
    /// Creates a coordinator for one build session.
    pub fn new(config: &CacheConfig) -> Self {
        let root = config.cache_root();
        debug!(
            "Transform cache {} at {}",
            if config.enabled { "enabled" } else { "disabled" },
            root.display()
        );

        Self {
            memory: MemoryTier::new(),
            filesystem: FilesystemTier::new(root),
            enabled: config.enabled,
            single_flight: config.single_flight,
            key_locks: KeyLocks::default(),
            stats: CacheStats::default(),
        }
    }

    /// Returns whether caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn memory(&self) -> &MemoryTier {
        &self.memory
    }

    pub fn filesystem(&self) -> &FilesystemTier {
        &self.filesystem
    }

    /// Returns the current hit/miss counters.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Computes the content hash for `path` as it currently is on disk.
    pub fn hash_for(
        &self,
        path: &ResolvedPath,
        context: &TransformContext,
    ) -> Result<ContentHash, CoreError> {
        let modified_at = SourceFile::open(path.path())?.modified_at()?;
        Ok(Self::content_hash(path.path(), context, modified_at))
    }

    fn content_hash(path: &Path, context: &TransformContext, modified_at: i64) -> ContentHash {
        compute_hash(
            context.platform(),
            context.serialized_config(),
            path,
            modified_at,
        )
    }

    /// Looks `path` up in the memory tier, then the filesystem tier.
    ///
    /// Fails only if the source file cannot be opened or read. Filesystem tier
    /// read errors are logged and treated as a miss.
    pub fn lookup(
        &self,
        path: &ResolvedPath,
        context: &TransformContext,
    ) -> Result<Lookup, CoreError> {
        let mut source = SourceFile::open(path.path())?;
        let modified_at = source.modified_at()?;
        let key = CacheKey::new(path.path(), context.platform());

        if !self.enabled {
            self.stats.bypassed();
            debug!("Cache disabled, loading {}", key);
            return Ok(Lookup::Miss(Miss {
                source_text: source.read_to_string()?,
                key,
                hash: None,
                modified_at,
            }));
        }

        if let Some(entry) = self.memory.read(&key) {
            if entry.is_fresh(modified_at) {
                self.stats.memory_hit();
                debug!("Memory cache hit for {}", key);
                return Ok(Lookup::Hit {
                    content: entry.data,
                    source: HitSource::Memory,
                    hash: None,
                });
            }

            self.stats.stale();
            debug!(
                "Stale memory entry for {} (cached mtime {}, current {})",
                key, entry.modified_at, modified_at
            );
            return Ok(Lookup::Miss(Miss {
                source_text: source.read_to_string()?,
                hash: Some(Self::content_hash(path.path(), context, modified_at)),
                key,
                modified_at,
            }));
        }

        let hash = Self::content_hash(path.path(), context, modified_at);
        match self.filesystem.read(&hash) {
            Ok(Some(content)) => {
                let content: Arc<str> = content.into();
                self.memory
                    .write(key.clone(), MemoryCacheEntry::new(content.clone(), modified_at));
                self.stats.filesystem_hit();
                debug!("Filesystem cache hit for {} ({})", key, hash);
                return Ok(Lookup::Hit {
                    content,
                    source: HitSource::Filesystem,
                    hash: Some(hash),
                });
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable cache entry for {}: {}", key, e),
        }

        self.stats.miss();
        debug!("Cache miss for {} ({})", key, hash);
        Ok(Lookup::Miss(Miss {
            source_text: source.read_to_string()?,
            key,
            hash: Some(hash),
            modified_at,
        }))
    }

    /// Writes `transformed` through to both tiers for the file behind `miss`.
    ///
    /// A failed filesystem write is logged and skipped; the memory tier is
    /// still updated. Fails with [`CoreError::MissingHash`] if `miss` has no hash.
    pub fn store(&self, miss: &Miss, transformed: &str) -> Result<(), CoreError> {
        self.store_shared(miss, transformed.into())
    }

    fn store_shared(&self, miss: &Miss, content: Arc<str>) -> Result<(), CoreError> {
        let hash = miss.hash.ok_or_else(|| CoreError::MissingHash {
            path: miss.key.path().to_path_buf(),
        })?;

        if let Err(e) = self.filesystem.write(&hash, &content) {
            self.stats.write_failure();
            warn!("Failed to persist cache entry for {}: {}", miss.key, e);
        }

        self.memory
            .write(miss.key.clone(), MemoryCacheEntry::new(content, miss.modified_at));
        Ok(())
    }

    /// Runs the full protocol for one file: lookup, transform on a miss, store.
    ///
    /// With single-flight enabled, concurrent loads of the same file and
    /// platform run one after another, so only the first one transforms.
    pub fn load<T>(
        &self,
        path: &ResolvedPath,
        context: &TransformContext,
        transformer: &T,
    ) -> Result<Loaded, CoreError>
    where
        T: Transformer + ?Sized,
    {
        if self.enabled && self.single_flight {
            let key = CacheKey::new(path.path(), context.platform());
            self.key_locks
                .run(&key, || self.load_unlocked(path, context, transformer))
        } else {
            self.load_unlocked(path, context, transformer)
        }
    }

    fn load_unlocked<T>(
        &self,
        path: &ResolvedPath,
        context: &TransformContext,
        transformer: &T,
    ) -> Result<Loaded, CoreError>
    where
        T: Transformer + ?Sized,
    {
        let miss = match self.lookup(path, context)? {
            Lookup::Hit {
                content, source, ..
            } => {
                return Ok(Loaded {
                    content,
                    source: source.into(),
                });
            }
            Lookup::Miss(miss) => miss,
        };

        let transformed = transformer
            .transform(&miss.source_text, path, context)
            .map_err(|e| CoreError::Transform {
                path: path.path().to_path_buf(),
                message: e.to_string(),
            })?;
        let content: Arc<str> = transformed.into();

        if miss.hash.is_some() {
            self.store_shared(&miss, content.clone())?;
        }

        Ok(Loaded {
            content,
            source: CacheSource::Miss,
        })
    }
}
