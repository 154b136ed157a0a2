//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_DIR` - Directory for the file-backed store (default: `.gomarketplace`)
//! - `CART_STORAGE_NAMESPACE` - Namespace prefix of the storage key (default: `@GoMarketplace`)

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::persistence::{CartPersistence, StorageKey};
use crate::storage::FileStore;

const DEFAULT_STORAGE_DIR: &str = ".gomarketplace";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory holding the persisted cart
    pub storage_dir: PathBuf,
    /// Namespace of the persisted record key
    pub namespace: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            namespace: StorageKey::DEFAULT_NAMESPACE.to_owned(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_dir = PathBuf::from(get_env_or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let namespace = get_optional_env("CART_STORAGE_NAMESPACE")
            .unwrap_or_else(|| StorageKey::DEFAULT_NAMESPACE.to_owned());
        validate_namespace(&namespace, "CART_STORAGE_NAMESPACE")?;

        Ok(Self {
            storage_dir,
            namespace,
        })
    }

    /// Returns the key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> StorageKey {
        StorageKey::for_namespace(&self.namespace)
    }

    /// Build a file-backed persistence bridge from this configuration.
    #[must_use]
    pub fn persistence(&self) -> CartPersistence {
        CartPersistence::new(
            Arc::new(FileStore::new(&self.storage_dir)),
            self.storage_key(),
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a namespace is usable as a key prefix.
fn validate_namespace(namespace: &str, var_name: &str) -> Result<(), ConfigError> {
    if namespace.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }
    if namespace.contains(':') {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must not contain ':' (it separates the namespace from the record name)".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.storage_dir, PathBuf::from(".gomarketplace"));
        assert_eq!(config.storage_key().as_str(), "@GoMarketplace:products");
    }

    #[test]
    fn test_validate_namespace_empty() {
        let result = validate_namespace("  ", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_validate_namespace_with_separator() {
        let result = validate_namespace("@App:v2", "TEST_VAR");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("TEST_VAR"));
    }

    #[test]
    fn test_validate_namespace_valid() {
        assert!(validate_namespace("@GoMarketplace", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_custom_namespace_key() {
        let config = CartConfig {
            namespace: "@Staging".to_owned(),
            ..CartConfig::default()
        };
        assert_eq!(config.storage_key().as_str(), "@Staging:products");
    }

    #[test]
    fn test_get_env_or_default_missing() {
        assert_eq!(
            get_env_or_default("GOMARKETPLACE_TEST_SURELY_UNSET", "fallback"),
            "fallback"
        );
    }
}
