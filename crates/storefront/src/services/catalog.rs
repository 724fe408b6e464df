//! Product catalog: browsing and listing products for sale.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use nebula_core::ProductId;

use crate::backend::{BlobStorage, DocumentDatabase};
use crate::models::{AccountProfile, Product, ProductDraft, Session};
use crate::services::database::{DatabaseError, DocumentPath};
use crate::services::storage::{PLACEHOLDER_IMAGE_URL, StorageError};

/// Seller name used when the profile has none.
pub const ANONYMOUS_SELLER: &str = "Anonymous";

/// Seller phone used when the profile has none.
pub const UNKNOWN_PHONE: &str = "N/A";

/// Errors that can occur while reading or listing products.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Listing a product requires a signed-in seller.
    #[error("sign in to list a product")]
    NotSignedIn,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An image attached to a new listing.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Browses and lists products through the backend facade.
#[derive(Clone)]
pub struct CatalogService {
    database: Arc<dyn DocumentDatabase>,
    storage: Arc<dyn BlobStorage>,
}

impl CatalogService {
    #[must_use]
    pub fn new(database: Arc<dyn DocumentDatabase>, storage: Arc<dyn BlobStorage>) -> Self {
        Self { database, storage }
    }

    /// Every listed product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the collection cannot be read.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let snapshot = self.database.read(DocumentPath::PRODUCTS).await?;
        Ok(snapshot.deserialize()?.unwrap_or_default())
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the collection cannot be read.
    pub async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self
            .list_products()
            .await?
            .into_iter()
            .find(|product| &product.id == id))
    }

    /// List a product for sale by the signed-in account.
    ///
    /// Seller name and phone come from the seller's profile. The image, if
    /// any, is uploaded under `products/<seller id>/<file name>`; without one
    /// the listing uses the placeholder image.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotSignedIn` without a session, or the
    /// underlying error if the upload or the append fails.
    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn list_product(
        &self,
        session: Option<&Session>,
        mut draft: ProductDraft,
        image: Option<ImageUpload>,
    ) -> Result<Product, CatalogError> {
        let session = session.ok_or(CatalogError::NotSignedIn)?;

        let (seller_name, seller_phone) = self.seller_contact(session).await;
        draft.seller_id = Some(session.uid.clone());
        draft.seller_name = seller_name;
        draft.seller_phone = seller_phone;

        draft.image_url = Some(match image {
            Some(image) => {
                let path = format!("products/{}/{}", session.uid, image.file_name);
                let uploaded = self.storage.upload(&path, image.bytes).await?;
                self.storage.download_url(&uploaded.full_path).await?
            }
            None => PLACEHOLDER_IMAGE_URL.to_string(),
        });

        let value = serde_json::to_value(&draft).map_err(|source| DatabaseError::InvalidPayload {
            path: DocumentPath::PRODUCTS.to_string(),
            source,
        })?;
        let id = ProductId::new(self.database.append(DocumentPath::PRODUCTS, value).await?);

        info!(product_id = %id, seller = %session.uid, "Product listed");
        Ok(draft.into_product(id))
    }

    /// Seller name and phone from the profile, with fallbacks for blanks.
    async fn seller_contact(&self, session: &Session) -> (String, String) {
        let profile = match self.database.read(&DocumentPath::account(&session.uid)).await {
            Ok(snapshot) => snapshot.deserialize::<AccountProfile>().unwrap_or_else(|e| {
                warn!(error = %e, "Seller profile is unreadable");
                None
            }),
            Err(e) => {
                warn!(error = %e, "Failed to read seller profile");
                None
            }
        };

        let or_default = |value: Option<String>, default: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let (name, phone) = profile.map_or((None, None), |p| (Some(p.name), Some(p.phone)));
        (
            or_default(name, ANONYMOUS_SELLER),
            or_default(phone, UNKNOWN_PHONE),
        )
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}
