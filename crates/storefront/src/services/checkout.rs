//! Checkout: turn the cart into an order.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::backend::DocumentDatabase;
use crate::models::{Order, Session};
use crate::services::cart::CartStore;
use crate::services::database::{DatabaseError, DocumentPath};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout requires a signed-in buyer.
    #[error("sign in to complete your purchase")]
    NotSignedIn,

    /// Nothing to order.
    #[error("the cart is empty")]
    EmptyCart,

    /// The order could not be stored.
    #[error("failed to store order: {0}")]
    Database(#[from] DatabaseError),
}

/// Places orders through the document database.
#[derive(Clone)]
pub struct CheckoutService {
    database: Arc<dyn DocumentDatabase>,
    cart: Arc<CartStore>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(database: Arc<dyn DocumentDatabase>, cart: Arc<CartStore>) -> Self {
        Self { database, cart }
    }

    /// Submit the cart as an order for `session`'s account, then clear it.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotSignedIn` without a session and
    /// `CheckoutError::EmptyCart` for an empty cart. If the order write fails
    /// the cart is left as it was.
    #[instrument(skip_all)]
    pub async fn checkout(&self, session: Option<&Session>) -> Result<Order, CheckoutError> {
        let session = session.ok_or(CheckoutError::NotSignedIn)?;

        let items = self.cart.get_cart();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = Order::from_cart(session.uid.clone(), items);
        let value = serde_json::to_value(&order).map_err(|source| DatabaseError::InvalidPayload {
            path: DocumentPath::order(&order.id),
            source,
        })?;

        self.database
            .write(&DocumentPath::order(&order.id), value)
            .await?;
        self.cart.clear_cart();

        info!(order_id = %order.id, total = %order.total, items = order.item_count(), "Order placed");
        Ok(order)
    }
}

impl std::fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}
