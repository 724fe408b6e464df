//! Document database error types.

use nebula_core::OrderId;
use thiserror::Error;

/// Errors returned by document database operations.
///
/// Unrecognized paths are not an error: they read as absent and accept
/// writes without effect.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The value does not have the shape the path's target stores.
    #[error("invalid payload for {path}: {source}")]
    InvalidPayload {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// An order is written once and never replaced.
    #[error("order {0} already exists")]
    OrderExists(OrderId),
}
