//! Backend emulators and the storefront flows built on them.
//!
//! # Emulators
//!
//! - `auth` - Accounts, sessions and session listeners
//! - `database` - Path-addressed document reads and writes
//! - `storage` - Blob uploads that resolve to a placeholder URL
//! - `latency` - Simulated network delay shared by the three above
//!
//! # Flows
//!
//! - `cart` - Local shopping cart
//! - `checkout` - Cart to order
//! - `catalog` - Browsing and listing products
//! - `chat` / `chatbot` - Support chat transcript and canned replies

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod chatbot;
pub mod checkout;
pub mod database;
pub mod latency;
pub mod storage;
