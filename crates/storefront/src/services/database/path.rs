//! Document path addressing.

use std::fmt;

use nebula_core::{AccountId, OrderId};

/// The logical target a path string addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPath {
    /// `users/<account id>`: one account's profile.
    AccountProfile(AccountId),
    /// `products`: the ordered product collection.
    Products,
    /// `chatbot/history`: the chat transcript singleton.
    ChatTranscript,
    /// `orders/<order id>`: one order.
    Order(OrderId),
    /// Anything else. Reads as absent, writes are dropped.
    Unrecognized(String),
}

impl DocumentPath {
    pub const PRODUCTS: &'static str = "products";
    pub const CHAT_TRANSCRIPT: &'static str = "chatbot/history";

    /// Classify `path`. Leading and trailing slashes are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_matches('/');
        let mut segments = trimmed.split('/');

        match (segments.next(), segments.next(), segments.next()) {
            (Some("products"), None, None) => Self::Products,
            (Some("chatbot"), Some("history"), None) => Self::ChatTranscript,
            (Some("users"), Some(id), None) if !id.is_empty() => {
                Self::AccountProfile(AccountId::new(id))
            }
            (Some("orders"), Some(id), None) if !id.is_empty() => Self::Order(OrderId::new(id)),
            _ => Self::Unrecognized(trimmed.to_string()),
        }
    }

    /// Path of an account's profile.
    #[must_use]
    pub fn account(id: &AccountId) -> String {
        format!("users/{id}")
    }

    /// Path of an order.
    #[must_use]
    pub fn order(id: &OrderId) -> String {
        format!("orders/{id}")
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountProfile(id) => write!(f, "users/{id}"),
            Self::Products => f.write_str(Self::PRODUCTS),
            Self::ChatTranscript => f.write_str(Self::CHAT_TRANSCRIPT),
            Self::Order(id) => write!(f, "orders/{id}"),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_paths() {
        assert_eq!(DocumentPath::parse("products"), DocumentPath::Products);
        assert_eq!(DocumentPath::parse("/products/"), DocumentPath::Products);
        assert_eq!(DocumentPath::parse("chatbot/history"), DocumentPath::ChatTranscript);
        assert_eq!(
            DocumentPath::parse("users/user_abc"),
            DocumentPath::AccountProfile(AccountId::new("user_abc"))
        );
        assert_eq!(
            DocumentPath::parse("orders/order_1"),
            DocumentPath::Order(OrderId::new("order_1"))
        );
    }

    #[test]
    fn test_unrecognized_paths() {
        for raw in ["", "users", "users/", "orders", "products/x", "chatbot", "misc/data"] {
            assert!(
                matches!(DocumentPath::parse(raw), DocumentPath::Unrecognized(_)),
                "{raw} should be unrecognized"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["products", "chatbot/history", "users/user_a", "orders/order_b"] {
            assert_eq!(DocumentPath::parse(raw).to_string(), raw);
        }
    }
}
