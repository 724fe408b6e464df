//! Session-related types.

use serde::{Deserialize, Serialize};

use nebula_core::{AccountId, Email};

use super::Account;

/// The signed-in identity.
///
/// A session is always a projection of exactly one [`Account`]; it is never
/// partially populated. "Signed out" is `Option::<Session>::None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// ID of the signed-in account.
    pub uid: AccountId,
    /// Email of the signed-in account.
    pub email: Email,
}

impl From<&Account> for Session {
    fn from(account: &Account) -> Self {
        Self {
            uid: account.id.clone(),
            email: account.email.clone(),
        }
    }
}
