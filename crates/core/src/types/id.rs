//! Prefixed string IDs for type-safe entity references.
//!
//! Every entity in the marketplace is addressed by a string of the form
//! `<prefix>_<suffix>`, e.g. `prod_3f9a1c0b7d2e`. The suffix is random, which
//! is enough to avoid collisions within a single process. It is not meant to
//! be unguessable.
//!
//! Use the `define_id!` macro to create wrappers that prevent accidentally
//! mixing IDs from different entity types.

/// Number of random characters appended after the prefix.
pub const ID_SUFFIX_LENGTH: usize = 12;

/// Generate a random lowercase hexadecimal suffix for a new ID.
#[must_use]
pub fn random_suffix() -> String {
    let mut suffix = uuid::Uuid::new_v4().simple().to_string();
    suffix.truncate(ID_SUFFIX_LENGTH);
    suffix
}

/// Macro to define a type-safe, prefixed string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `generate()` producing `<prefix>_<random suffix>`
/// - `new()`, `as_str()`, `into_inner()` and `From` conversions
///
/// # Example
///
/// ```rust
/// # use nebula_core::define_id;
/// define_id!(WidgetId, "widget");
///
/// let id = WidgetId::generate();
/// assert!(id.as_str().starts_with("widget_"));
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix shared by every generated ID of this type.
            pub const PREFIX: &'static str = $prefix;

            /// Generate a fresh ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(format!("{}_{}", Self::PREFIX, $crate::types::id::random_suffix()))
            }

            /// Wrap an existing ID string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Entity IDs used by the storefront
define_id!(AccountId, "user");
define_id!(ProductId, "prod");
define_id!(OrderId, "order");
define_id!(ChatMessageId, "msg");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generated_ids_carry_prefix() {
        assert!(AccountId::generate().as_str().starts_with("user_"));
        assert!(ProductId::generate().as_str().starts_with("prod_"));
        assert!(OrderId::generate().as_str().starts_with("order_"));
    }

    #[test]
    fn test_suffix_length() {
        let id = ProductId::generate();
        let suffix = id.as_str().strip_prefix("prod_").unwrap();
        assert_eq!(suffix.len(), ID_SUFFIX_LENGTH);
    }

    #[test]
    fn test_generated_ids_do_not_collide() {
        let ids: HashSet<_> = (0..1000).map(|_| OrderId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = AccountId::new("user_abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"user_abc\"");
        let parsed: AccountId = serde_json::from_str("\"user_abc\"").unwrap();
        assert_eq!(parsed, id);
    }
}
