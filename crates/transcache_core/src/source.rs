//! Scoped access to a source file on disk.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::CoreError;

/// A source file opened once per load.
///
/// The same handle serves the stat used for hashing and staleness checks and,
/// on a miss, the read used for transformation. It is closed on drop.
pub struct SourceFile<'a> {
    path: &'a Path,
    file: File,
}

impl<'a> SourceFile<'a> {
    /// Opens the file at `path`.
    pub fn open(path: &'a Path) -> Result<Self, CoreError> {
        let file = File::open(path).map_err(|e| CoreError::source_read(path, e))?;
        Ok(Self { path, file })
    }

    /// Returns the modification time in milliseconds since the Unix epoch.
    ///
    /// Times before the epoch are negative.
    pub fn modified_at(&self) -> Result<i64, CoreError> {
        let modified = self
            .file
            .metadata()
            .and_then(|metadata| metadata.modified())
            .map_err(|e| CoreError::source_read(self.path, e))?;

        Ok(match modified.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_millis() as i64,
            Err(e) => -(e.duration().as_millis() as i64),
        })
    }

    /// Reads the whole file as UTF-8 text.
    pub fn read_to_string(&mut self) -> Result<String, CoreError> {
        let mut content = String::new();
        self.file
            .read_to_string(&mut content)
            .map_err(|e| CoreError::source_read(self.path, e))?;
        Ok(content)
    }
}
