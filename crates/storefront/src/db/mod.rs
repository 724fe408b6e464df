//! Durable state for the backend emulator.
//!
//! # Layers
//!
//! - [`backing`] - Named-blob key-value stores (file, memory, null)
//! - [`collection`] - One in-memory collection mirrored to one blob
//!
//! # Blob layout
//!
//! | Blob | Contents |
//! |---|---|
//! | `marketplace_users` | `[[email, account], ...]` |
//! | `marketplace_products` | `[product, ...]` in listing order |
//! | `marketplace_orders` | `[order, ...]` in checkout order |
//! | `marketplace_chatbot` | `[message, ...]` |
//! | `marketplace_currentUser` | `session` or `null` |
//! | `marketplace_cart` | `[line, ...]` |

pub mod backing;
pub mod collection;

use std::sync::Arc;

use thiserror::Error;

pub use backing::{BackingStore, FileBackingStore, MemoryBackingStore, NullBackingStore};
pub use collection::Collection;

use crate::models::{AccountMap, ChatMessage, Order, Product, Session};

/// Stable blob names, one per collection.
pub mod blobs {
    pub const ACCOUNTS: &str = "marketplace_users";
    pub const PRODUCTS: &str = "marketplace_products";
    pub const ORDERS: &str = "marketplace_orders";
    pub const CHAT: &str = "marketplace_chatbot";
    pub const SESSION: &str = "marketplace_currentUser";
    pub const CART: &str = "marketplace_cart";
}

/// Errors raised by the persistence layer.
///
/// These never escape a [`Collection`] mutation: they are logged there and
/// the in-memory change is kept.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the medium failed.
    #[error("I/O error on blob {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be encoded.
    #[error("failed to serialize blob {name}: {source}")]
    Serialization {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The emulator's collections, each loaded once from the backing store.
///
/// Shared by handle between the auth and database emulators.
#[derive(Debug)]
pub struct StoreCollections {
    pub accounts: Collection<AccountMap>,
    pub products: Collection<Vec<Product>>,
    pub orders: Collection<Vec<Order>>,
    pub chat: Collection<Vec<ChatMessage>>,
    pub session: Collection<Option<Session>>,
}

impl StoreCollections {
    /// Load every collection from `store`.
    #[must_use]
    pub fn load(store: &Arc<dyn BackingStore>) -> Self {
        Self {
            accounts: Collection::load(blobs::ACCOUNTS, Arc::clone(store)),
            products: Collection::load(blobs::PRODUCTS, Arc::clone(store)),
            orders: Collection::load(blobs::ORDERS, Arc::clone(store)),
            chat: Collection::load(blobs::CHAT, Arc::clone(store)),
            session: Collection::load(blobs::SESSION, Arc::clone(store)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_loads_empty_collections() {
        let store: Arc<dyn BackingStore> = Arc::new(MemoryBackingStore::new());
        let collections = StoreCollections::load(&store);

        assert!(collections.accounts.snapshot().is_empty());
        assert!(collections.products.snapshot().is_empty());
        assert!(collections.orders.snapshot().is_empty());
        assert!(collections.chat.snapshot().is_empty());
        assert!(collections.session.snapshot().is_none());
    }

    #[test]
    fn test_each_collection_has_its_own_blob() {
        let memory = MemoryBackingStore::new();
        let store: Arc<dyn BackingStore> = Arc::new(memory.clone());
        let collections = StoreCollections::load(&store);

        collections.chat.mutate(|chat| chat.push(ChatMessage::user("hi")));
        collections.session.mutate(|session| *session = None);

        assert_eq!(
            memory.names(),
            vec![blobs::CHAT.to_string(), blobs::SESSION.to_string()]
        );
    }
}
