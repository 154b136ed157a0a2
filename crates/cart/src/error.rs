//! Errors returned to cart consumers.
//!
//! Persistence failures never reach consumers through this type: a failed
//! load degrades to an empty cart and a failed save is logged and recorded
//! on the store (see [`CartStore::last_save_error`](crate::CartStore::last_save_error)).

use gomarketplace_core::{ProductId, UnknownLineItem};
use thiserror::Error;

/// Error type for cart consumer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The cart was requested outside the lifetime of its provider.
    #[error("'use_cart' must be used within a 'CartProvider'")]
    MissingProviderScope,

    /// `increment`/`decrement` named a product that is not in the cart.
    #[error("no line item with id '{0}' in the cart")]
    UnknownLineItem(ProductId),
}

impl From<UnknownLineItem> for CartError {
    fn from(err: UnknownLineItem) -> Self {
        Self::UnknownLineItem(err.0)
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_provider_scope_display() {
        assert_eq!(
            CartError::MissingProviderScope.to_string(),
            "'use_cart' must be used within a 'CartProvider'"
        );
    }

    #[test]
    fn test_unknown_line_item_from_core() {
        let err = CartError::from(UnknownLineItem(ProductId::new("p9")));
        assert_eq!(err, CartError::UnknownLineItem(ProductId::new("p9")));
        assert_eq!(err.to_string(), "no line item with id 'p9' in the cart");
    }

    // Errors cross task boundaries alongside tokio channels.
    const _: () = {
        #[allow(dead_code)]
        fn assert_send_sync<T: Send + Sync>() {}

        #[allow(dead_code)]
        fn check() {
            assert_send_sync::<CartError>();
        }
    };
}
