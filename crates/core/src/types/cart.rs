//! The cart and its mutation rules.
//!
//! [`Cart`] is a plain value: every method is synchronous and free of I/O.
//! The store in the `cart` crate clones the current cart, applies one of the
//! mutations below, and publishes the result as a new snapshot.
//!
//! # Invariants
//!
//! - At most one line item per [`ProductId`].
//! - Every line item holds at least one unit (guaranteed by [`Quantity`]).
//!
//! Lookups are linear scans. Carts hold tens of items, and a `Vec` keeps the
//! display order without a side index.

use serde::{Deserialize, Serialize};

use super::{LineItem, NewLineItem, ProductId, Quantity};

/// A mutation referenced a product that is not in the cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("no line item with id '{0}' in the cart")]
pub struct UnknownLineItem(pub ProductId);

/// Ordered collection of line items, unique by product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from previously stored line items.
    ///
    /// Duplicate IDs are folded into their first occurrence by summing the
    /// quantities, so a cart built here always satisfies the uniqueness rule.
    #[must_use]
    pub fn from_line_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            match cart.position(&item.id) {
                Some(index) => {
                    if let Some(existing) = cart.items.get_mut(index) {
                        let sum = existing.quantity.get().saturating_add(item.quantity.get());
                        // Both operands are at least 1, so the sum is too.
                        if let Ok(quantity) = Quantity::new(sum) {
                            existing.quantity = quantity;
                        }
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn line_items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line item by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct line items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart holds no line items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all line items (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart only its quantity changes; the
    /// stored title, image and price are kept even if `item` carries
    /// different values. Otherwise a new line item with one unit is appended.
    pub fn add(&mut self, item: NewLineItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.increment(),
            None => self.items.push(LineItem::from(item)),
        }
    }

    /// Add one unit to an existing line item.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownLineItem`] if the product is not in the cart. The
    /// cart is left unchanged.
    pub fn increment(&mut self, id: &ProductId) -> Result<(), UnknownLineItem> {
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| UnknownLineItem(id.clone()))?;
        item.quantity = item.quantity.increment();
        Ok(())
    }

    /// Remove one unit from an existing line item.
    ///
    /// When the last unit is removed the whole line item leaves the cart and
    /// is returned; otherwise `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownLineItem`] if the product is not in the cart. The
    /// cart is left unchanged.
    pub fn decrement(&mut self, id: &ProductId) -> Result<Option<LineItem>, UnknownLineItem> {
        let index = self
            .position(id)
            .ok_or_else(|| UnknownLineItem(id.clone()))?;
        let Some(item) = self.items.get_mut(index) else {
            return Err(UnknownLineItem(id.clone()));
        };

        if let Some(quantity) = item.quantity.decrement() {
            item.quantity = quantity;
            Ok(None)
        } else {
            Ok(Some(self.items.remove(index)))
        }
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
