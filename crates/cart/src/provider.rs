//! Scoped ownership of the cart store.
//!
//! A [`CartProvider`] is mounted once per session and owns the
//! [`CartStore`]. Screens receive a [`CartHandle`] and call
//! [`CartHandle::use_cart`] whenever they need the cart; once the provider is
//! unmounted every handle fails fast with
//! [`CartError::MissingProviderScope`].

use std::sync::Weak;

use crate::error::{CartError, Result};
use crate::persistence::CartPersistence;
use crate::store::{CartStore, CartStoreInner};

/// Owner of the session's cart store.
///
/// Dropping the provider unmounts it without waiting for pending saves;
/// prefer [`unmount`](Self::unmount) to make sure the last change is stored.
#[derive(Debug)]
pub struct CartProvider {
    store: CartStore,
}

impl CartProvider {
    /// Open the cart from `persistence` and mount a provider around it.
    ///
    /// The stored cart is fully loaded before this returns.
    pub async fn mount(persistence: CartPersistence) -> Self {
        Self {
            store: CartStore::open(persistence).await,
        }
    }

    /// Get a handle for a consumer inside this provider's scope.
    #[must_use]
    pub fn handle(&self) -> CartHandle {
        CartHandle {
            store: std::sync::Arc::downgrade(&self.store.inner),
        }
    }

    /// Get the store directly.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// Write pending saves and end the scope.
    pub async fn unmount(self) {
        self.store.close().await;
    }
}

impl Drop for CartProvider {
    fn drop(&mut self) {
        self.store.close_nowait();
    }
}

/// Consumer-side access to a provider's cart.
///
/// Holds only a weak reference, so handles never keep a provider's store
/// alive. `CartHandle::default()` is a handle obtained outside any provider.
#[derive(Debug, Clone, Default)]
pub struct CartHandle {
    store: Weak<CartStoreInner>,
}

impl CartHandle {
    /// Get the cart of the enclosing provider.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingProviderScope`] if the handle was not
    /// created by a provider or that provider has been unmounted.
    pub fn use_cart(&self) -> Result<CartStore> {
        let inner = self.store.upgrade().ok_or(CartError::MissingProviderScope)?;
        let store = CartStore { inner };
        if store.is_closed() {
            return Err(CartError::MissingProviderScope);
        }
        Ok(store)
    }
}
