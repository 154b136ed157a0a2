//! Cart commands.
//!
//! Every command mounts a provider over the configured file store, performs
//! at most one mutation, prints the resulting cart and unmounts, which waits
//! for the save to land before the process exits.

use std::fmt::Write as _;

use gomarketplace_cart::{CartConfig, CartError, CartProvider, CartStore, ConfigError};
use gomarketplace_core::{Cart, NewLineItem, ProductId};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cart rejected the operation.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The cart could not be encoded for output.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The change was applied in memory but could not be stored.
    #[error("Failed to save cart: {0}")]
    Save(String),
}

/// Print the cart.
pub async fn show(config: &CartConfig, json: bool) -> Result<(), CommandError> {
    with_cart(config, |cart| {
        if json {
            print_output(&serde_json::to_string_pretty(cart.products().line_items())?);
        } else {
            print_output(&render_table(&cart.products()));
        }
        Ok(())
    })
    .await
}

/// Add one unit of a product.
pub async fn add(config: &CartConfig, item: NewLineItem) -> Result<(), CommandError> {
    with_cart(config, |cart| {
        cart.add_to_cart(item);
        print_output(&render_table(&cart.products()));
        Ok(())
    })
    .await
}

/// Add one unit to a product already in the cart.
pub async fn increment(config: &CartConfig, id: &ProductId) -> Result<(), CommandError> {
    with_cart(config, |cart| {
        cart.increment(id)?;
        print_output(&render_table(&cart.products()));
        Ok(())
    })
    .await
}

/// Remove one unit of a product.
pub async fn decrement(config: &CartConfig, id: &ProductId) -> Result<(), CommandError> {
    with_cart(config, |cart| {
        cart.decrement(id)?;
        print_output(&render_table(&cart.products()));
        Ok(())
    })
    .await
}

/// Mount the configured cart, run `f` against it, and unmount.
///
/// A save that fails after `f` succeeded is reported as
/// [`CommandError::Save`].
async fn with_cart(
    config: &CartConfig,
    f: impl FnOnce(&CartStore) -> Result<(), CommandError>,
) -> Result<(), CommandError> {
    tracing::debug!(
        storage_dir = %config.storage_dir.display(),
        key = %config.storage_key(),
        "Opening cart"
    );

    let provider = CartProvider::mount(config.persistence()).await;
    let cart = provider.handle().use_cart()?;
    let result = f(&cart);

    cart.flush().await;
    let save_error = cart.last_save_error();
    provider.unmount().await;

    result?;
    save_error.map_or(Ok(()), |e| Err(CommandError::Save(e)))
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}

/// Render the cart as a fixed-width table followed by the item count.
fn render_table(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_owned();
    }

    let id_width = cart
        .line_items()
        .iter()
        .map(|item| item.id.as_str().len())
        .max()
        .unwrap_or(0)
        .max("ID".len());
    let title_width = cart
        .line_items()
        .iter()
        .map(|item| item.title.len())
        .max()
        .unwrap_or(0)
        .max("TITLE".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<id_width$}  {:<title_width$}  {:>10}  {:>5}",
        "ID", "TITLE", "PRICE", "QTY"
    );
    for item in cart {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<title_width$}  {:>10}  {:>5}",
            item.id,
            item.title,
            item.price.to_string(),
            item.quantity.get()
        );
    }
    let _ = write!(out, "{} item(s)", cart.total_quantity());
    out
}
