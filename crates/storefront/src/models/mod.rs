//! Domain models for the storefront.
//!
//! Every record here is stored as JSON, both in the backing store and on the
//! wire of the document database facade. Field names use camelCase so that
//! documents look the same whichever backend produced them.

pub mod account;
pub mod cart;
pub mod chat;
pub mod order;
pub mod product;
pub mod session;

pub use account::{Account, AccountMap, AccountProfile, ProfileUpdate};
pub use cart::CartLine;
pub use chat::ChatMessage;
pub use order::Order;
pub use product::{Product, ProductDraft};
pub use session::Session;
