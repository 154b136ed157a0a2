//! Key-value storage backends.
//!
//! The cart treats device storage as an opaque async string store: one key,
//! one serialized value. [`KeyValueStore`] is that seam; the persistence
//! bridge only ever talks to `Arc<dyn KeyValueStore>`.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, shared between clones
//! - [`FileStore`] - one file per key under a directory

mod file;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the key.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The backend is unavailable (e.g. shut down or misconfigured).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous string key-value store.
///
/// Methods take `&self`; implementations use interior mutability.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Succeeds if the key did not exist.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
