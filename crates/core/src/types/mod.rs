//! Core types for GoMarketplace.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod line_item;
pub mod price;
pub mod quantity;

pub use cart::{Cart, UnknownLineItem};
pub use id::ProductId;
pub use line_item::{LineItem, NewLineItem};
pub use price::UnitPrice;
pub use quantity::{Quantity, QuantityError};
