//! File-backed key-value store.
//!
//! Layout:
//!
//! ```text
//! <dir>/
//!     %40GoMarketplace%3Aproducts.json   -- one file per key
//! ```
//!
//! Keys are percent-encoded into file names so any key maps to exactly one
//! file. Each write goes to its own uniquely named temp file in the same
//! directory, which is then renamed over the target, so a reader never sees a
//! half-written value even with several writers.

use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{KeyValueStore, StorageError};

/// Store that keeps each key in its own file under a directory.
///
/// The directory is created lazily on the first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the root directory of this store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file that holds `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for an empty key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("key cannot be empty".to_owned()));
        }
        Ok(self.dir.join(format!("{}.json", urlencoding::encode(key))))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || write_replacing(&dir, &path, value.as_bytes()))
            .await
            .map_err(|e| StorageError::Unavailable(format!("write task failed: {e}")))?
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Write `value` to a fresh temp file in `dir` and rename it over `path`.
fn write_replacing(dir: &Path, path: &Path, value: &[u8]) -> Result<(), StorageError> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(value)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
