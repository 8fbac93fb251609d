//! The external transformer seam.

use thiserror::Error;

use crate::{ResolvedPath, TransformContext};

/// Failure reported by a [`Transformer`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Turns source text into transformed text (syntax stripping, down-leveling,
/// rewrite rules). Opaque to the cache.
pub trait Transformer: Send + Sync {
    fn transform(
        &self,
        source: &str,
        path: &ResolvedPath,
        context: &TransformContext,
    ) -> Result<String, TransformError>;
}

impl<F> Transformer for F
where
    F: Fn(&str, &ResolvedPath, &TransformContext) -> Result<String, TransformError> + Send + Sync,
{
    fn transform(
        &self,
        source: &str,
        path: &ResolvedPath,
        context: &TransformContext,
    ) -> Result<String, TransformError> {
        self(source, path, context)
    }
}
