//! Shopping cart.
//!
//! The cart is local state, not a remote call: every operation is
//! synchronous and persists before it returns. Lines are keyed by product ID
//! and kept in the order products were first added.
//!
//! A line holds at most `u32::MAX` units. Larger requested quantities are
//! capped, and counts and totals saturate rather than overflow.

use std::sync::Arc;

use tracing::{debug, warn};

use nebula_core::{Price, ProductId};

use crate::db::{BackingStore, Collection, blobs};
use crate::models::{CartLine, Product, cart::total_quantity};

/// The cart aggregate, persisted under its own blob.
#[derive(Debug)]
pub struct CartStore {
    lines: Collection<Vec<CartLine>>,
}

impl CartStore {
    /// Load the persisted cart, or start empty.
    #[must_use]
    pub fn load(store: Arc<dyn BackingStore>) -> Self {
        Self {
            lines: Collection::load(blobs::CART, store),
        }
    }

    /// Current lines.
    #[must_use]
    pub fn get_cart(&self) -> Vec<CartLine> {
        self.lines.snapshot()
    }

    /// Add one unit of `product`. A product already in the cart gets its
    /// quantity bumped instead of a second line.
    pub fn add_to_cart(&self, product: &Product) -> Vec<CartLine> {
        self.lines.mutate(|lines| {
            match lines.iter_mut().find(|line| line.id == product.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(1),
                None => lines.push(CartLine::from_product(product)),
            }
            debug!(product_id = %product.id, "Added to cart");
            lines.clone()
        })
    }

    /// Drop the line for `id`, if any.
    pub fn remove_from_cart(&self, id: &ProductId) -> Vec<CartLine> {
        self.lines.mutate(|lines| {
            lines.retain(|line| &line.id != id);
            lines.clone()
        })
    }

    /// Set the quantity for `id`. Zero or less removes the line; a product
    /// not in the cart is left out. Quantities above `u32::MAX` are capped.
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) -> Vec<CartLine> {
        if quantity <= 0 {
            return self.remove_from_cart(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or_else(|_| {
            warn!(product_id = %id, requested = quantity, "Quantity capped");
            u32::MAX
        });

        self.lines.mutate(|lines| {
            if let Some(line) = lines.iter_mut().find(|line| &line.id == id) {
                line.quantity = quantity;
            }
            lines.clone()
        })
    }

    /// Empty the cart.
    pub fn clear_cart(&self) -> Vec<CartLine> {
        self.lines.mutate(|lines| {
            lines.clear();
            Vec::new()
        })
    }

    /// Replace the cart wholesale. Lines with a zero quantity are dropped.
    pub fn save_cart(&self, mut cart: Vec<CartLine>) -> Vec<CartLine> {
        cart.retain(|line| line.quantity > 0);
        self.lines.mutate(|lines| {
            lines.clone_from(&cart);
            cart
        })
    }

    /// Sum of `price * quantity` over every line.
    #[must_use]
    pub fn get_total(&self) -> Price {
        self.lines
            .read(|lines| lines.iter().map(CartLine::line_total).sum())
    }

    /// Sum of quantities over every line, saturating at `u32::MAX`.
    #[must_use]
    pub fn get_item_count(&self) -> u32 {
        self.lines
            .read(|lines| total_quantity(lines))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.read(Vec::is_empty)
    }
}
