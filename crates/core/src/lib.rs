//! GoMarketplace Core - Shared cart types.
//!
//! This crate provides the types shared by every GoMarketplace component:
//! - `cart` - Cart store, persistence bridge and provider scope
//! - `cli` - Command-line front end over a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types and the pure cart mutation rules - no
//! I/O, no storage, no async runtime. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, quantities, line items and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
