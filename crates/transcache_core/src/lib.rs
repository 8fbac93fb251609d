//! # transcache_core
//!
//! Cache coordinator for per-file bundler transforms.
//!
//! This crate provides:
//! - The `CacheCoordinator` that a build pipeline calls once per loaded file
//! - Cache configuration loading
//! - The `Transformer` seam for the external transform step
//! - Parallel batch loading
//!
//! ## Example
//!
//! ```rust,ignore
//! use transcache_core::{CacheConfig, CacheCoordinator, ResolvedPath, TransformContext};
//!
//! let config = CacheConfig::from_file("transcache.json")?;
//! let cache = CacheCoordinator::new(&config);
//! let context = TransformContext::new(Some("ios"), &babel_options)?;
//!
//! let path = ResolvedPath::new("/app/src/index.js")?;
//! let loaded = cache.load(&path, &context, &transformer)?;
//! println!("{} ({})", path.path().display(), loaded.source);
//! ```

mod config;
mod context;
mod coordinator;
mod error;
mod parallel;
mod resolved_path;
mod single_flight;
mod source;
mod stats;
mod transformer;

pub use config::CacheConfig;
pub use context::TransformContext;
pub use coordinator::{CacheCoordinator, CacheSource, HitSource, Loaded, Lookup, Miss};
pub use error::CoreError;
pub use parallel::LoadManyResult;
pub use resolved_path::ResolvedPath;
pub use stats::CacheStatsSnapshot;
pub use transformer::{TransformError, Transformer};

pub use transcache_cache::{CacheKey, ContentHash};
