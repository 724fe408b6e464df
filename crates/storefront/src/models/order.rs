//! Order types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nebula_core::{AccountId, OrderId, OrderStatus, Price};

use super::CartLine;

/// A placed order. Written once at checkout and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Buyer account.
    pub user_id: AccountId,
    /// Cart lines as they were at checkout.
    pub items: Vec<CartLine>,
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build a completed order from cart lines, computing the total.
    #[must_use]
    pub fn from_cart(user_id: AccountId, items: Vec<CartLine>) -> Self {
        let total = items.iter().map(CartLine::line_total).sum();
        Self {
            id: OrderId::generate(),
            user_id,
            items,
            total,
            status: OrderStatus::Completed,
            created_at: Utc::now(),
        }
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        super::cart::total_quantity(&self.items)
    }
}
