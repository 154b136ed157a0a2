//! Integration tests for GoMarketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gomarketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Shopper flows through a mounted provider
//! - `cart_persistence` - Restarts, on-disk format and storage failures
//!
//! This library holds the fixtures shared by the test binaries.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use gomarketplace_cart::{CartPersistence, CartProvider, FileStore, StorageKey};
use gomarketplace_core::{NewLineItem, ProductId, UnitPrice};
use tempfile::TempDir;

/// A file-backed cart in a throwaway directory.
///
/// Mounting twice over the same context simulates an app restart.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Create a context with an empty storage directory.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// The file store backing this context.
    #[must_use]
    pub fn store(&self) -> FileStore {
        FileStore::new(self.dir.path())
    }

    /// A persistence bridge using the default storage key.
    #[must_use]
    pub fn persistence(&self) -> CartPersistence {
        CartPersistence::new(Arc::new(self.store()), StorageKey::default())
    }

    /// Mount a provider over this context's storage.
    pub async fn mount(&self) -> CartProvider {
        CartProvider::mount(self.persistence()).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The shirt from the reference scenarios.
#[must_use]
pub fn shirt() -> NewLineItem {
    NewLineItem {
        id: ProductId::new("p1"),
        title: "Shirt".to_owned(),
        image_url: "u1".to_owned(),
        price: UnitPrice::from_cents(1000),
    }
}

/// A product with the given ID and otherwise fixed data.
#[must_use]
pub fn product(id: &str) -> NewLineItem {
    NewLineItem {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        image_url: format!("https://cdn.example/{id}.png"),
        price: UnitPrice::from_cents(1250),
    }
}
