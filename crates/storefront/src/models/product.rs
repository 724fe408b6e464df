//! Product listing types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nebula_core::{AccountId, Price, ProductId};

/// A listed product. Appended once, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<AccountId>,
    #[serde(default)]
    pub seller_name: String,
    #[serde(default)]
    pub seller_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A product as submitted for listing, before an ID is assigned.
///
/// Only `name` and `price` are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<AccountId>,
    #[serde(default)]
    pub seller_name: String,
    #[serde(default)]
    pub seller_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl ProductDraft {
    /// A draft with just a name and price.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
            description: String::new(),
            seller_id: None,
            seller_name: String::new(),
            seller_phone: String::new(),
            image_url: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the assigned ID.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            seller_id: self.seller_id,
            seller_name: self.seller_name,
            seller_phone: self.seller_phone,
            image_url: self.image_url,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_draft_decodes() {
        let draft: ProductDraft =
            serde_json::from_value(serde_json::json!({"name": "Lamp", "price": 10})).unwrap();
        assert_eq!(draft.name, "Lamp");
        assert_eq!(draft.price, Price::from(10));
        assert!(draft.seller_id.is_none());
    }

    #[test]
    fn test_draft_without_price_is_rejected() {
        let result: Result<ProductDraft, _> =
            serde_json::from_value(serde_json::json!({"name": "Lamp"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_into_product_attaches_id() {
        let id = ProductId::generate();
        let product = ProductDraft::new("Lamp", Price::from(10)).into_product(id.clone());
        assert_eq!(product.id, id);

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], id.as_str());
        assert!(json.get("sellerName").is_some());
    }
}
