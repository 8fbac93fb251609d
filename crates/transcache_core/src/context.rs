//! Transform context: target platform plus the full transform configuration.

use serde::Serialize;

use crate::CoreError;

/// Everything besides the file itself that a transform result depends on.
///
/// The configuration is serialized once here so that hashing on a miss never
/// re-serializes a potentially large value.
#[derive(Debug, Clone)]
pub struct TransformContext {
    platform: Option<String>,
    config: serde_json::Value,
    serialized_config: String,
}

impl TransformContext {
    /// Builds a context from any serializable transform configuration.
    pub fn new(platform: Option<&str>, config: &impl Serialize) -> Result<Self, CoreError> {
        let config = serde_json::to_value(config)
            .map_err(|e| CoreError::config(format!("Unserializable transform config: {}", e)))?;
        // Objects in a `Value` are key-sorted, so this form is deterministic.
        let serialized_config = serde_json::to_string(&config)
            .map_err(|e| CoreError::config(format!("Unserializable transform config: {}", e)))?;

        Ok(Self {
            platform: platform.map(str::to_string),
            config,
            serialized_config,
        })
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn config(&self) -> &serde_json::Value {
        &self.config
    }

    /// Canonical JSON form of the configuration, as fed to the content hash.
    pub fn serialized_config(&self) -> &str {
        &self.serialized_config
    }
}
