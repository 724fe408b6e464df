//! Subcommand implementations.
//!
//! Each command prints its result to stdout. Errors are returned to `main`,
//! which prints the user-facing message and exits non-zero.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod chat;

use nebula_storefront::models::Session;
use nebula_storefront::{AppError, AppState};

/// The current session, or an error telling the user to log in.
fn require_session(state: &AppState) -> Result<Session, AppError> {
    state
        .session()
        .ok_or_else(|| AppError::Unauthorized("no session".to_string()))
}
