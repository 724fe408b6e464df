//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] nebula_core::EmailError),

    /// Sign-up with an email that is already registered.
    #[error("an account with this email already exists")]
    DuplicateAccount,

    /// Sign-in with an email that has no account.
    #[error("no account exists for this email")]
    AccountNotFound,

    /// Sign-in with the wrong password.
    #[error("invalid credential")]
    InvalidCredential,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
