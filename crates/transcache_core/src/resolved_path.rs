//! Typed output of path resolution.

use std::path::{Path, PathBuf};

use crate::CoreError;

/// A source path as handed over by the resolver, validated once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath {
    path: PathBuf,
    basename: String,
    extension: Option<String>,
}

impl ResolvedPath {
    /// Validates `path` and derives its basename and extension.
    ///
    /// The path must be absolute (it is part of the content hash) and must
    /// end in a UTF-8 file name. It is rebuilt from its components, so `.`
    /// segments and repeated or trailing separators are dropped and every
    /// spelling of a file hashes the same.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path: PathBuf = path.into().components().collect();

        if !path.is_absolute() {
            return Err(CoreError::invalid_path(path, "path is not absolute"));
        }

        let basename = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => return Err(CoreError::invalid_path(path, "path has no file name")),
        };

        let extension = match path.extension() {
            Some(ext) => Some(
                ext.to_str()
                    .ok_or_else(|| CoreError::invalid_path(&path, "extension is not UTF-8"))?
                    .to_string(),
            ),
            None => None,
        };

        Ok(Self {
            path,
            basename,
            extension,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without its extension.
    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_resolved_path_parts() {
        let resolved = ResolvedPath::new("/app/src/Button.ios.tsx").unwrap();

        assert_eq!(resolved.path(), Path::new("/app/src/Button.ios.tsx"));
        assert_eq!(resolved.basename(), "Button.ios");
        assert_eq!(resolved.extension(), Some("tsx"));
    }

    #[test]
    fn test_resolved_path_without_extension() {
        let resolved = ResolvedPath::new("/app/Makefile").unwrap();

        assert_eq!(resolved.basename(), "Makefile");
        assert_eq!(resolved.extension(), None);
    }

    #[rstest]
    #[case::cur_dir("/app/./src/a.js")]
    #[case::doubled_separator("/app//src/a.js")]
    #[case::trailing_separator("/app/src/a.js/")]
    fn test_resolved_path_is_normalized(#[case] spelling: &str) {
        let resolved = ResolvedPath::new(spelling).unwrap();

        assert_eq!(
            resolved.path().as_os_str(),
            Path::new("/app/src/a.js").as_os_str()
        );
        assert_eq!(resolved.basename(), "a");
    }

    #[rstest]
    #[case::relative("src/index.js", "not absolute")]
    #[case::root("/", "no file name")]
    fn test_resolved_path_rejects(#[case] path: &str, #[case] reason: &str) {
        let err = ResolvedPath::new(path).unwrap_err();
        assert!(
            err.to_string().contains(reason),
            "Error message '{}' should contain '{}'",
            err,
            reason
        );
    }
}
