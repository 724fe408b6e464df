//! Nebula storefront library.
//!
//! An offline marketplace backend: auth, a document database and blob
//! storage emulated in process behind the [`backend`] facade, persisted to a
//! local backing store, plus the cart and the storefront flows built on top.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use backend::{Backend, BackendKind, Subscription};
pub use config::StorefrontConfig;
pub use error::AppError;
pub use state::AppState;
