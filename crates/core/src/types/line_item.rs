//! Cart line items.

use serde::{Deserialize, Serialize};

use super::{ProductId, Quantity, UnitPrice};

/// Product data handed to the cart when a shopper taps "add to cart".
///
/// Same fields as [`LineItem`] minus the quantity, which the cart owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Product image reference.
    pub image_url: String,
    /// Unit price.
    pub price: UnitPrice,
}

/// One product entry in the cart.
///
/// The serialized field names are part of the persisted record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Product image reference.
    pub image_url: String,
    /// Unit price.
    pub price: UnitPrice,
    /// Units in the cart, always at least one.
    pub quantity: Quantity,
}

impl LineItem {
    /// Build a line item holding `quantity` units of `item`.
    #[must_use]
    pub fn new(item: NewLineItem, quantity: Quantity) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity,
        }
    }
}

impl From<NewLineItem> for LineItem {
    fn from(item: NewLineItem) -> Self {
        Self::new(item, Quantity::one())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_field_names() {
        let item = LineItem::from(NewLineItem {
            id: ProductId::new("p1"),
            title: "Shirt".to_owned(),
            image_url: "u1".to_owned(),
            price: UnitPrice::from_cents(1000),
        });

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "p1",
                "title": "Shirt",
                "image_url": "u1",
                "price": 10,
                "quantity": 1
            })
        );
    }

    #[test]
    fn test_reads_record_written_by_mobile_app() {
        let json = r#"{"id":"3","title":"Mug","image_url":"https://cdn/x.png","price":12.5,"quantity":4}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id.as_str(), "3");
        assert_eq!(item.price, UnitPrice::from_cents(1250));
        assert_eq!(item.quantity.get(), 4);
    }
}
