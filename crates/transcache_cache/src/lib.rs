//! # transcache_cache
//!
//! Storage layer for the per-file transform cache.
//!
//! ## Tiers
//!
//! 1. **Memory tier**: process-lifetime map from `(path, platform)` to the last
//!    transformed text and the modification time it was produced from
//! 2. **Filesystem tier**: durable, content-addressed entries under a cache root,
//!    keyed by a [`ContentHash`] that already encodes every transform input
//!
//! Staleness is only possible in the memory tier. A filesystem entry is
//! addressed by a hash over `(platform, config, path, mtime)`, so a hit there
//! is always safe to serve.

mod error;
mod filesystem;
mod hasher;
mod key;
mod memory;

pub use error::CacheError;
pub use filesystem::FilesystemTier;
pub use hasher::compute_hash;
pub use key::{CacheKey, ContentHash};
pub use memory::{MemoryCacheEntry, MemoryTier};
