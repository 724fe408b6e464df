//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for the storefront flows. Front ends
//! show [`AppError::user_message`] to the shopper and call
//! [`AppError::report`] so unexpected failures reach Sentry.

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::catalog::CatalogError;
use crate::services::checkout::CheckoutError;
use crate::services::database::DatabaseError;
use crate::services::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Document database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Blob storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Placing an order failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Reading or listing products failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The shopper must sign in first.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad input from the shopper.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this is a fault in the system rather than in the input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Database(DatabaseError::InvalidPayload { .. })
                | Self::Storage(StorageError::NotFound(_))
                | Self::Config(_)
                | Self::Checkout(CheckoutError::Database(_))
                | Self::Catalog(
                    CatalogError::Database(_) | CatalogError::Storage(StorageError::NotFound(_))
                )
                | Self::Auth(AuthError::PasswordHash)
        )
    }

    /// Capture internal errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Storefront error");
        } else {
            tracing::debug!(error = %self, "Storefront error");
        }
    }

    /// A sentence telling the shopper what went wrong and what to do next.
    ///
    /// Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => {
                    "That email address doesn't look right. Check it and try again.".to_string()
                }
                AuthError::DuplicateAccount => {
                    "An account with this email already exists. Log in instead.".to_string()
                }
                AuthError::AccountNotFound => {
                    "No account found for this email. Sign up first.".to_string()
                }
                AuthError::InvalidCredential => {
                    "Incorrect password. Try again.".to_string()
                }
                AuthError::PasswordHash => {
                    "We couldn't secure your password. Try again.".to_string()
                }
            },
            Self::Checkout(CheckoutError::NotSignedIn) => {
                "Please log in to complete your purchase.".to_string()
            }
            Self::Checkout(CheckoutError::EmptyCart) => "Your cart is empty!".to_string(),
            Self::Catalog(CatalogError::NotSignedIn) => {
                "You must be logged in to list a product.".to_string()
            }
            Self::Database(DatabaseError::OrderExists(_))
            | Self::Checkout(CheckoutError::Database(DatabaseError::OrderExists(_))) => {
                "This order was already placed.".to_string()
            }
            Self::Storage(StorageError::UploadFailed { .. })
            | Self::Catalog(CatalogError::Storage(StorageError::UploadFailed { .. })) => {
                "The image could not be uploaded. Check the file name and try again.".to_string()
            }
            Self::Config(err) => format!("Configuration problem: {err}"),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Unauthorized(_) => "Please log in first.".to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Database(_) | Self::Storage(_) | Self::Checkout(_) | Self::Catalog(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
