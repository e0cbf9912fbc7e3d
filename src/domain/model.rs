use serde::{Deserialize, Serialize};

pub type ProductId = u64;

/// One product entry in the cart. Field names follow the storefront's stored format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(rename = "image")]
    pub image_ref: String,
    #[serde(rename = "amount")]
    pub quantity: u32,
}

impl CartLineItem {
    pub fn from_product(product: ProductRecord, quantity: u32) -> Self {
        Self {
            product_id: product.product_id,
            title: product.title,
            price: product.price,
            image_ref: product.image_ref,
            quantity,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Snapshot of availability; never cached beyond the query that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockRecord {
    pub product_id: ProductId,
    pub available_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(rename = "image")]
    pub image_ref: String,
}

/// Target quantity for a line-item. `amount` may be zero or negative, which is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// What a successful cart operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    /// The cart changed and was written to the persistence sink.
    Updated,
    /// Nothing to do; no stock query, write or notification happened.
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_uses_storefront_field_names() {
        let item = CartLineItem {
            product_id: 7,
            title: "Tênis".to_string(),
            price: 139.9,
            image_ref: "https://img/7.jpg".to_string(),
            quantity: 3,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["amount"], 3);
        assert_eq!(json["image"], "https://img/7.jpg");
    }

    #[test]
    fn test_subtotal() {
        let item = CartLineItem {
            product_id: 1,
            title: "Sock".to_string(),
            price: 2.5,
            image_ref: String::new(),
            quantity: 4,
        };
        assert_eq!(item.subtotal(), 10.0);
    }
}
