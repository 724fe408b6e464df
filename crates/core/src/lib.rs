//! Nebula Core - Shared types library.
//!
//! This crate provides the value types shared by the Nebula components:
//! - `storefront` - Backend emulator, cart and storefront flows
//! - `cli` - Command-line driver over the storefront facade
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no clocks.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Prefixed string IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
