//! Content-addressed filesystem tier.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{CacheError, ContentHash};

/// Durable mapping from [`ContentHash`] to transformed text.
///
/// Entries live at `<root>/<first two hex chars>/<hash>`. Writes go through a
/// temporary file in the same shard directory and are renamed into place, so
/// concurrent processes sharing a root never observe a partial entry. Since
/// a hash always maps to the same content, racing writes are harmless.
pub struct FilesystemTier {
    root: PathBuf,
}

impl FilesystemTier {
    /// Creates a tier rooted at `root`. The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns where the entry for `hash` is stored.
    pub fn entry_path(&self, hash: &ContentHash) -> PathBuf {
        let hex = hash.to_hex();
        self.root.join(&hex[..2]).join(hex)
    }

    /// Reads the entry for `hash`.
    ///
    /// A missing entry is `Ok(None)`. Any other I/O failure is an error, which
    /// callers are expected to treat as a miss.
    pub fn read(&self, hash: &ContentHash) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(hash);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache entry at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(CacheError::read(path, e)),
        }
    }

    /// Writes `content` as the entry for `hash`. Safe to repeat.
    ///
    /// The data is flushed to disk before the rename, so an entry that is
    /// visible under its final name is always complete.
    pub fn write(&self, hash: &ContentHash, content: &str) -> Result<(), CacheError> {
        let path = self.entry_path(hash);
        let shard_dir = path.parent().unwrap_or(&self.root);

        fs::create_dir_all(shard_dir).map_err(|e| CacheError::write(&path, e))?;

        let mut tmp = NamedTempFile::new_in(shard_dir).map_err(|e| CacheError::write(&path, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| CacheError::write(&path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| CacheError::write(&path, e))?;
        tmp.persist(&path)
            .map_err(|e| CacheError::write(&path, e.error))?;

        debug!("Wrote cache entry {}", path.display());
        Ok(())
    }

    /// Returns true if an entry for `hash` exists.
    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.entry_path(hash).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_hash;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn hash_for(path: &str, modified_at: i64) -> ContentHash {
        compute_hash(Some("ios"), "{}", Path::new(path), modified_at)
    }

    #[test]
    fn test_read_missing_entry_is_none() {
        let dir = tempdir().unwrap();
        let tier = FilesystemTier::new(dir.path());

        assert!(tier.read(&hash_for("/app/a.js", 1)).unwrap().is_none());
    }

    #[test]
    fn test_read_with_missing_root_is_none() {
        let dir = tempdir().unwrap();
        let tier = FilesystemTier::new(dir.path().join("does/not/exist"));

        assert!(tier.read(&hash_for("/app/a.js", 1)).unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let tier = FilesystemTier::new(dir.path().join("cache"));
        let hash = hash_for("/app/a.js", 1);

        tier.write(&hash, "const a=1;").unwrap();

        assert!(tier.contains(&hash));
        assert_eq!(tier.read(&hash).unwrap().as_deref(), Some("const a=1;"));
    }

    #[test]
    fn test_write_is_idempotent() {
        let dir = tempdir().unwrap();
        let tier = FilesystemTier::new(dir.path());
        let hash = hash_for("/app/a.js", 1);

        tier.write(&hash, "const a=1;").unwrap();
        tier.write(&hash, "const a=1;").unwrap();

        assert_eq!(tier.read(&hash).unwrap().as_deref(), Some("const a=1;"));
        let shard = fs::read_dir(tier.entry_path(&hash).parent().unwrap())
            .unwrap()
            .count();
        assert_eq!(shard, 1, "no temporary files should be left behind");
    }

    #[test]
    fn test_write_large_entry_is_complete() {
        let dir = tempdir().unwrap();
        let tier = FilesystemTier::new(dir.path());
        let hash = hash_for("/app/bundle.js", 1);
        let content = "const a = 1;\n".repeat(100_000);

        tier.write(&hash, &content).unwrap();

        let stored = fs::metadata(tier.entry_path(&hash)).unwrap();
        assert_eq!(stored.len(), content.len() as u64);
        assert_eq!(tier.read(&hash).unwrap().as_deref(), Some(content.as_str()));
    }

    #[test]
    fn test_entry_path_is_pure_function_of_hash() {
        let hash = hash_for("/app/a.js", 1);
        let a = FilesystemTier::new("/cache");
        let b = FilesystemTier::new("/cache");
        let hex = hash.to_hex();

        assert_eq!(a.entry_path(&hash), b.entry_path(&hash));
        assert_eq!(
            a.entry_path(&hash),
            PathBuf::from("/cache").join(&hex[..2]).join(&hex)
        );
    }

    #[test]
    fn test_separate_instances_share_entries() {
        let dir = tempdir().unwrap();
        let hash = hash_for("/app/a.js", 1);

        FilesystemTier::new(dir.path()).write(&hash, "shared").unwrap();

        let other = FilesystemTier::new(dir.path());
        assert_eq!(other.read(&hash).unwrap().as_deref(), Some("shared"));
    }

    #[test]
    fn test_write_fails_when_root_is_a_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let tier = FilesystemTier::new(&blocker);

        let err = tier.write(&hash_for("/app/a.js", 1), "x").unwrap_err();
        assert!(matches!(err, CacheError::Write { .. }));
    }

    #[test]
    fn test_read_fails_when_entry_is_a_directory() {
        let dir = tempdir().unwrap();
        let tier = FilesystemTier::new(dir.path());
        let hash = hash_for("/app/a.js", 1);
        fs::create_dir_all(tier.entry_path(&hash)).unwrap();

        let err = tier.read(&hash).unwrap_err();
        assert!(matches!(err, CacheError::Read { .. }));
    }
}
