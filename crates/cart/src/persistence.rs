//! Persistence bridge between the cart and a key-value store.
//!
//! The whole cart is stored as one JSON array under a single key:
//!
//! ```json
//! [{"id":"p1","title":"Shirt","image_url":"u1","price":10,"quantity":1}]
//! ```
//!
//! There is no version field. Loading is best-effort: anything that cannot be
//! read or decoded yields an empty cart.

use std::fmt;
use std::sync::Arc;

use gomarketplace_core::{Cart, LineItem};
use thiserror::Error;
use tracing::instrument;

use crate::storage::{KeyValueStore, StorageError};

/// Errors that can occur while saving the cart.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key under which the cart record lives, `<namespace>:products`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Namespace used by the mobile app.
    pub const DEFAULT_NAMESPACE: &'static str = "@GoMarketplace";

    /// Build the cart key for an application namespace.
    #[must_use]
    pub fn for_namespace(namespace: &str) -> Self {
        Self(format!("{namespace}:products"))
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StorageKey {
    fn default() -> Self {
        Self::for_namespace(Self::DEFAULT_NAMESPACE)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loads and saves the serialized cart.
///
/// Cheap to clone; clones share the underlying store.
#[derive(Debug, Clone)]
pub struct CartPersistence {
    store: Arc<dyn KeyValueStore>,
    key: StorageKey,
}

impl CartPersistence {
    /// Create a bridge writing to `key` in `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: StorageKey) -> Self {
        Self { store, key }
    }

    /// Returns the key the cart is stored under.
    #[must_use]
    pub const fn key(&self) -> &StorageKey {
        &self.key
    }

    /// Load the stored cart.
    ///
    /// Returns an empty cart when no record exists, when the store fails, or
    /// when the record does not decode. Failures are logged, never returned.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&self) -> Cart {
        let raw = match self.store.get(self.key.as_str()).await {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => {
                tracing::debug!("No stored cart, starting empty");
                return Cart::new();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
                return Cart::new();
            }
        };

        match serde_json::from_str::<Vec<LineItem>>(&raw) {
            Ok(items) => {
                let cart = Cart::from_line_items(items);
                tracing::debug!(line_items = cart.len(), "Stored cart loaded");
                cart
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored cart is corrupt, starting empty");
                Cart::new()
            }
        }
    }

    /// Serialize `cart` and write it under the cart key.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if encoding or the store write fails.
    #[instrument(skip(self, cart), fields(key = %self.key, line_items = cart.len()))]
    pub async fn save(&self, cart: &Cart) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(cart.line_items())?;
        self.store.set(self.key.as_str(), encoded).await?;
        tracing::debug!("Cart saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use gomarketplace_core::{NewLineItem, ProductId, UnitPrice};

    use super::*;
    use crate::storage::MemoryStore;

    /// Store whose every operation fails.
    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("broken".to_owned()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("broken".to_owned()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("broken".to_owned()))
        }
    }

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(NewLineItem {
            id: ProductId::new("p1"),
            title: "Shirt".to_owned(),
            image_url: "u1".to_owned(),
            price: UnitPrice::from_cents(1000),
        });
        cart.add(NewLineItem {
            id: ProductId::new("p2"),
            title: "Mug".to_owned(),
            image_url: "u2".to_owned(),
            price: UnitPrice::from_cents(1250),
        });
        cart.increment(&ProductId::new("p2")).unwrap();
        cart
    }

    fn bridge(store: &MemoryStore) -> CartPersistence {
        CartPersistence::new(Arc::new(store.clone()), StorageKey::default())
    }

    #[test]
    fn test_default_key() {
        assert_eq!(StorageKey::default().as_str(), "@GoMarketplace:products");
    }

    #[tokio::test]
    async fn test_load_without_record_is_empty() {
        let store = MemoryStore::new();
        assert!(bridge(&store).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = MemoryStore::new();
        let persistence = bridge(&store);
        let cart = sample_cart();

        persistence.save(&cart).await.unwrap();

        assert_eq!(persistence.load().await, cart);
    }

    #[tokio::test]
    async fn test_saved_record_format() {
        let store = MemoryStore::new();
        bridge(&store).save(&sample_cart()).await.unwrap();

        let raw = store.get("@GoMarketplace:products").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"id": "p1", "title": "Shirt", "image_url": "u1", "price": 10, "quantity": 1},
                {"id": "p2", "title": "Mug", "image_url": "u2", "price": 12.5, "quantity": 2}
            ])
        );
    }

    #[tokio::test]
    async fn test_load_reads_numeric_and_string_prices() {
        let store = MemoryStore::new();
        let raw = r#"[
            {"id":"p1","title":"Shirt","image_url":"u1","price":10,"quantity":1},
            {"id":"p2","title":"Mug","image_url":"u2","price":12.5,"quantity":2},
            {"id":"p3","title":"Cap","image_url":"u3","price":"7.25","quantity":1}
        ]"#;
        store
            .set("@GoMarketplace:products", raw.to_owned())
            .await
            .unwrap();

        let cart = bridge(&store).load().await;

        let prices: Vec<UnitPrice> = cart.line_items().iter().map(|item| item.price).collect();
        assert_eq!(
            prices,
            [
                UnitPrice::from_cents(1000),
                UnitPrice::from_cents(1250),
                UnitPrice::from_cents(725),
            ]
        );
    }

    #[tokio::test]
    async fn test_high_precision_price_round_trips() {
        let store = MemoryStore::new();
        let persistence = bridge(&store);
        let mut cart = Cart::new();
        cart.add(NewLineItem {
            id: ProductId::new("p1"),
            title: "Shirt".to_owned(),
            image_url: "u1".to_owned(),
            price: "19.1234567890123456789".parse().unwrap(),
        });

        persistence.save(&cart).await.unwrap();

        assert_eq!(persistence.load().await, cart);
    }

    #[tokio::test]
    async fn test_load_corrupt_record_is_empty() {
        let store = MemoryStore::new();
        store
            .set("@GoMarketplace:products", "{not json".to_owned())
            .await
            .unwrap();
        assert!(bridge(&store).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_zero_quantity_record_is_empty() {
        let store = MemoryStore::new();
        let raw = r#"[{"id":"p1","title":"Shirt","image_url":"u1","price":10,"quantity":0}]"#;
        store
            .set("@GoMarketplace:products", raw.to_owned())
            .await
            .unwrap();
        assert!(bridge(&store).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_empty_string_is_empty() {
        let store = MemoryStore::new();
        store
            .set("@GoMarketplace:products", String::new())
            .await
            .unwrap();
        assert!(bridge(&store).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_storage_failure_is_empty() {
        let persistence = CartPersistence::new(Arc::new(BrokenStore), StorageKey::default());
        assert!(persistence.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_storage_failure_is_returned() {
        let persistence = CartPersistence::new(Arc::new(BrokenStore), StorageKey::default());
        let err = persistence.save(&sample_cart()).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Storage(_)));
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = MemoryStore::new();
        let staging =
            CartPersistence::new(Arc::new(store.clone()), StorageKey::for_namespace("@Staging"));
        staging.save(&sample_cart()).await.unwrap();

        assert!(bridge(&store).load().await.is_empty());
        assert_eq!(staging.load().await.len(), 2);
    }
}
