//! Parallel batch loading.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::{CacheCoordinator, CoreError, Loaded, ResolvedPath, TransformContext, Transformer};

/// Result of [`CacheCoordinator::load_many`].
///
/// Contains a tuple of:
/// - Successfully loaded files, in input order
/// - Failed files with their errors
pub type LoadManyResult = (Vec<(PathBuf, Loaded)>, Vec<(PathBuf, CoreError)>);

impl CacheCoordinator {
    /// Loads every path in parallel through [`CacheCoordinator::load`].
    ///
    /// A failure for one file never aborts the others.
    pub fn load_many<T>(
        &self,
        paths: &[ResolvedPath],
        context: &TransformContext,
        transformer: &T,
    ) -> LoadManyResult
    where
        T: Transformer + ?Sized,
    {
        let results: Vec<Result<(PathBuf, Loaded), (PathBuf, CoreError)>> = paths
            .par_iter()
            .map(|path| {
                self.load(path, context, transformer)
                    .map(|loaded| (path.path().to_path_buf(), loaded))
                    .map_err(|e| (path.path().to_path_buf(), e))
            })
            .collect();

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(loaded) => successes.push(loaded),
                Err((path, error)) => {
                    warn!("Failed to load {}: {}", path.display(), error);
                    failures.push((path, error));
                }
            }
        }

        let stats = self.stats();
        info!(
            "Loaded {} files ({} memory hits, {} filesystem hits, {} misses, {} failed)",
            successes.len(),
            stats.memory_hits,
            stats.filesystem_hits,
            stats.misses,
            failures.len()
        );

        (successes, failures)
    }
}
