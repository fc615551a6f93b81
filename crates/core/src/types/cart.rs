//! Cart line items.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// One row in the cart.
///
/// `price`, `name` and `image` are copied from the product when the line is
/// created; later catalog changes do not reach carts already holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    /// Snapshot a product into a new line.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.primary_image().to_string(),
            quantity,
        }
    }

    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// `price × quantity`, or `None` if it overflows.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Price> {
        self.price.checked_times(self.quantity)
    }
}
