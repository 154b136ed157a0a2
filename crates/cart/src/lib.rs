//! GoMarketplace cart store.
//!
//! Holds the shopper's cart in memory, publishes every change to subscribed
//! consumers, and mirrors the cart into a local key-value store so it
//! survives restarts.
//!
//! # Architecture
//!
//! - [`storage`] - Opaque async key-value stores (in-memory and file-backed)
//! - [`persistence`] - Loads and saves the serialized cart under one key
//! - [`store`] - The [`CartStore`]: snapshots, mutators and the ordered writer
//! - [`provider`] - Scoped ownership of a store and consumer handles
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use gomarketplace_cart::{CartPersistence, CartProvider, MemoryStore, StorageKey};
//! use gomarketplace_core::{NewLineItem, ProductId, UnitPrice};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), gomarketplace_cart::CartError> {
//! let persistence = CartPersistence::new(Arc::new(MemoryStore::new()), StorageKey::default());
//! let provider = CartProvider::mount(persistence).await;
//!
//! let cart = provider.handle().use_cart()?;
//! cart.add_to_cart(NewLineItem {
//!     id: ProductId::new("p1"),
//!     title: "Shirt".to_owned(),
//!     image_url: "u1".to_owned(),
//!     price: UnitPrice::from_cents(1000),
//! });
//! cart.increment(&ProductId::new("p1"))?;
//! assert_eq!(cart.products().total_quantity(), 2);
//!
//! provider.unmount().await;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod persistence;
pub mod provider;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError};
pub use error::CartError;
pub use persistence::{CartPersistence, PersistenceError, StorageKey};
pub use provider::{CartHandle, CartProvider};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::CartStore;
