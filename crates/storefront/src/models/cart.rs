//! Cart line items.

use serde::{Deserialize, Serialize};

use nebula_core::{Price, ProductId};

use super::Product;

/// One product-plus-quantity entry in the cart.
///
/// Keyed by product ID. `quantity` is at least 1 while the line exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub seller_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// A new line holding one unit of `product`.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            seller_name: product.seller_name.clone(),
            image_url: product.image_url.clone(),
            quantity: 1,
        }
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Sum of quantities over `lines`, saturating at `u32::MAX`.
#[must_use]
pub fn total_quantity(lines: &[CartLine]) -> u32 {
    lines
        .iter()
        .fold(0_u32, |count, line| count.saturating_add(line.quantity))
}
