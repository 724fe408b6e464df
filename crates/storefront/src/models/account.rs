//! Account domain types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use nebula_core::{AccountId, Email};

/// A marketplace account.
///
/// Created by sign-up, updated through profile writes, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Generated once at sign-up and never reused.
    pub id: AccountId,
    /// Unique across all accounts.
    pub email: Email,
    /// Opaque credential compared at sign-in (an Argon2 PHC string).
    pub password_hash: String,
    /// Display name, empty until the profile is filled in.
    #[serde(default)]
    pub name: String,
    /// Contact phone, empty until the profile is filled in.
    #[serde(default)]
    pub phone: String,
}

impl Account {
    /// Public view of this account.
    #[must_use]
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
        }
    }

    /// Merge a partial profile update. Fields absent from `update` are kept.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
    }
}

/// The fields of an [`Account`] that may be read back through the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: AccountId,
    pub email: Email,
    pub name: String,
    pub phone: String,
}

/// Partial profile write.
///
/// Unknown keys in the incoming document are ignored, which keeps `id`,
/// `email` and the credential immutable through this path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// All accounts, keyed by email.
///
/// Persisted as a sequence of `[email, account]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(Email, Account)>", into = "Vec<(Email, Account)>")]
pub struct AccountMap(BTreeMap<Email, Account>);

impl AccountMap {
    /// Look up an account by email.
    #[must_use]
    pub fn get(&self, email: &Email) -> Option<&Account> {
        self.0.get(email)
    }

    /// Whether an account with this email exists.
    #[must_use]
    pub fn contains(&self, email: &Email) -> bool {
        self.0.contains_key(email)
    }

    /// Insert an account, keyed by its email. Returns `false` if the email
    /// is already taken, in which case nothing changes.
    pub fn insert(&mut self, account: Account) -> bool {
        if self.0.contains_key(&account.email) {
            return false;
        }
        self.0.insert(account.email.clone(), account);
        true
    }

    /// Look up an account by ID.
    #[must_use]
    pub fn find_by_id(&self, id: &AccountId) -> Option<&Account> {
        self.0.values().find(|a| &a.id == id)
    }

    /// Look up an account by ID for modification.
    pub fn find_by_id_mut(&mut self, id: &AccountId) -> Option<&mut Account> {
        self.0.values_mut().find(|a| &a.id == id)
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<(Email, Account)>> for AccountMap {
    fn from(pairs: Vec<(Email, Account)>) -> Self {
        Self(pairs.into_iter().collect())
    }
}

impl From<AccountMap> for Vec<(Email, Account)> {
    fn from(map: AccountMap) -> Self {
        map.0.into_iter().collect()
    }
}
