//! Integration tests for shopper flows through a mounted cart provider.
//!
//! These follow the reference scenarios: add, re-add, increment, decrement
//! down to removal, restart, and an increment of an unknown product.

use gomarketplace_cart::CartError;
use gomarketplace_core::ProductId;
use gomarketplace_integration_tests::{TestContext, product, shirt};

// =============================================================================
// Mutation Scenarios
// =============================================================================

#[tokio::test]
async fn test_add_increment_decrement_to_removal() {
    let ctx = TestContext::new();
    let provider = ctx.mount().await;
    let cart = provider.handle().use_cart().expect("provider is mounted");
    let id = ProductId::new("p1");

    // 1. Empty cart, add the shirt
    cart.add_to_cart(shirt());
    let snapshot = cart.products();
    assert_eq!(snapshot.len(), 1);
    let item = snapshot.get(&id).expect("shirt in cart");
    assert_eq!(item.title, "Shirt");
    assert_eq!(item.image_url, "u1");
    assert_eq!(item.quantity.get(), 1);

    // 2. Same id again: one entry, quantity 2
    cart.add_to_cart(shirt());
    assert_eq!(cart.products().len(), 1);
    assert_eq!(cart.products().get(&id).map(|i| i.quantity.get()), Some(2));

    // 3. Increment
    cart.increment(&id).expect("known id");
    assert_eq!(cart.products().get(&id).map(|i| i.quantity.get()), Some(3));

    // 4. Decrement three times: 2, 1, removed
    cart.decrement(&id).expect("known id");
    assert_eq!(cart.products().get(&id).map(|i| i.quantity.get()), Some(2));
    cart.decrement(&id).expect("known id");
    assert_eq!(cart.products().get(&id).map(|i| i.quantity.get()), Some(1));
    cart.decrement(&id).expect("known id");
    assert!(cart.products().is_empty());

    provider.unmount().await;
}

#[tokio::test]
async fn test_increment_unknown_id_on_empty_cart() {
    let ctx = TestContext::new();
    let provider = ctx.mount().await;
    let cart = provider.handle().use_cart().expect("provider is mounted");

    let err = cart
        .increment(&ProductId::new("unknown-id"))
        .expect_err("unknown id must be rejected");

    assert_eq!(err, CartError::UnknownLineItem(ProductId::new("unknown-id")));
    assert!(cart.products().is_empty());

    cart.flush().await;
    provider.unmount().await;

    // Nothing was written for the rejected call.
    let remounted = ctx.mount().await;
    assert!(remounted.store().products().is_empty());
}

#[tokio::test]
async fn test_decrement_unknown_id_keeps_cart() {
    let ctx = TestContext::new();
    let provider = ctx.mount().await;
    let cart = provider.handle().use_cart().expect("provider is mounted");
    cart.add_to_cart(shirt());

    assert!(matches!(
        cart.decrement(&ProductId::new("p2")),
        Err(CartError::UnknownLineItem(_))
    ));
    assert_eq!(cart.products().total_quantity(), 1);

    provider.unmount().await;
}

#[tokio::test]
async fn test_quantity_floor_under_mixed_mutations() {
    let ctx = TestContext::new();
    let provider = ctx.mount().await;
    let cart = provider.handle().use_cart().expect("provider is mounted");
    let ids = ["a", "b", "c"];

    for round in 0..30_usize {
        let id = ids[round % ids.len()];
        match round % 5 {
            0 | 1 => cart.add_to_cart(product(id)),
            2 => {
                let _ = cart.increment(&ProductId::new(id));
            }
            _ => {
                let _ = cart.decrement(&ProductId::new(id));
            }
        }

        let snapshot = cart.products();
        assert!(snapshot.line_items().iter().all(|i| i.quantity.get() >= 1));

        let mut seen: Vec<&str> = snapshot.line_items().iter().map(|i| i.id.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), snapshot.len(), "duplicate ids after round {round}");
    }

    provider.unmount().await;
}

// =============================================================================
// Subscription Scenarios
// =============================================================================

#[tokio::test]
async fn test_subscriber_sees_snapshot_before_save_settles() {
    let ctx = TestContext::new();
    let provider = ctx.mount().await;
    let cart = provider.handle().use_cart().expect("provider is mounted");
    let mut screen = cart.subscribe();

    cart.add_to_cart(shirt());

    // Published synchronously by the mutator, no await needed.
    assert!(screen.has_changed().expect("sender alive"));
    assert_eq!(screen.borrow_and_update().total_quantity(), 1);

    provider.unmount().await;
}

#[tokio::test]
async fn test_two_screens_observe_same_cart() {
    let ctx = TestContext::new();
    let provider = ctx.mount().await;
    let product_screen = provider.handle();
    let cart_screen = provider.handle();
    let mut badge = cart_screen
        .use_cart()
        .expect("provider is mounted")
        .subscribe();

    let cart = product_screen.use_cart().expect("provider is mounted");
    cart.add_to_cart(product("p7"));
    cart.add_to_cart(product("p8"));

    badge.changed().await.expect("sender alive");
    assert_eq!(badge.borrow_and_update().total_quantity(), 2);

    provider.unmount().await;
}

// =============================================================================
// Provider Scope
// =============================================================================

#[tokio::test]
async fn test_use_cart_after_unmount_fails_fast() {
    let ctx = TestContext::new();
    let provider = ctx.mount().await;
    let handle = provider.handle();
    provider.unmount().await;

    assert_eq!(
        handle.use_cart().expect_err("scope has ended"),
        CartError::MissingProviderScope
    );
}
