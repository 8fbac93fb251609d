//! Cache configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::CoreError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration for the transform cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether to use the cache tiers at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Root directory of the filesystem tier.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Whether concurrent loads of the same key share one transform.
    #[serde(default = "default_single_flight")]
    pub single_flight: bool,

    /// Base directory for resolving a relative `cache_dir`.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Config file names searched by [`CacheConfig::discover`], in order.
const CONFIG_FILES: &[&str] = &["transcache.json", ".transcache.json"];

fn default_enabled() -> bool {
    true
}

fn default_cache_dir() -> String {
    ".transcache".to_string()
}

fn default_single_flight() -> bool {
    true
}

impl CacheConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            enabled: default_enabled(),
            cache_dir: default_cache_dir(),
            single_flight: default_single_flight(),
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| CoreError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Finds a config file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|path| path.is_file())
    }

    /// Parses configuration from JSON string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| CoreError::config(format!("Invalid JSON: {}", e)))?;

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(CoreError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| CoreError::config(format!("Invalid config: {}", e)))
    }

    /// Returns the effective filesystem tier root.
    pub fn cache_root(&self) -> PathBuf {
        let dir = Path::new(&self.cache_dir);
        match &self.base_dir {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir.to_path_buf(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn test_config_new() {
        let config = CacheConfig::new();
        assert!(config.enabled);
        assert!(config.single_flight);
        assert_eq!(config.cache_dir, ".transcache");
        assert!(config.base_dir.is_none());
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config = CacheConfig::from_json("{}").unwrap();
        assert!(config.enabled);
        assert!(config.single_flight);
        assert_eq!(config.cache_dir, ".transcache");
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "enabled": false,
            "cache_dir": "node_modules/.cache/transcache",
            "single_flight": false
        }"#;

        let config = CacheConfig::from_json(json).unwrap();
        assert!(!config.enabled);
        assert!(!config.single_flight);
        assert_eq!(config.cache_dir, "node_modules/.cache/transcache");
    }

    #[test]
    fn test_config_from_file_resolves_relative_cache_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transcache.json");
        fs::write(&path, r#"{ "cache_dir": "build/cache" }"#).unwrap();

        let config = CacheConfig::from_file(&path).unwrap();
        assert_eq!(config.cache_root(), dir.path().join("build/cache"));
    }

    #[test]
    fn test_discover_config() {
        let dir = tempdir().unwrap();
        assert!(CacheConfig::discover(dir.path()).is_none());

        fs::write(dir.path().join(".transcache.json"), "{}").unwrap();
        assert_eq!(
            CacheConfig::discover(dir.path()),
            Some(dir.path().join(".transcache.json"))
        );

        fs::write(dir.path().join("transcache.json"), "{}").unwrap();
        assert_eq!(
            CacheConfig::discover(dir.path()),
            Some(dir.path().join("transcache.json"))
        );
    }

    #[test]
    fn test_cache_root_keeps_absolute_dir() {
        let mut config = CacheConfig::new();
        config.cache_dir = "/var/cache/transcache".to_string();
        config.base_dir = Some(PathBuf::from("/project"));

        assert_eq!(config.cache_root(), PathBuf::from("/var/cache/transcache"));
    }

    #[test]
    fn test_config_from_missing_file() {
        let err = CacheConfig::from_file("/nonexistent/transcache.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[rstest]
    #[case::invalid_json("{ enabled: ", "Invalid JSON")]
    #[case::unknown_property(r#"{ "cache": true }"#, "Config validation failed")]
    #[case::type_mismatch(r#"{ "enabled": "yes" }"#, "Config validation failed")]
    #[case::empty_cache_dir(r#"{ "cache_dir": "" }"#, "Config validation failed")]
    fn test_config_validation_errors(#[case] json: &str, #[case] expected_error_part: &str) {
        let result = CacheConfig::from_json(json);
        assert!(result.is_err(), "Expected error for JSON: {}", json);
        let err = result.unwrap_err();
        assert!(
            err.to_string().contains(expected_error_part),
            "Error message '{}' should contain '{}'",
            err,
            expected_error_part
        );
    }
}
