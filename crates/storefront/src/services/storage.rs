//! Blob storage emulator.
//!
//! Accepts uploads and hands back a placeholder image URL. Payloads are
//! dropped; only the uploaded paths are remembered, so a URL can be resolved
//! for an object that was actually uploaded in this process.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::backend::BlobStorage;
use crate::services::latency::{LatencyProfile, remote_call};

/// URL every emulated object resolves to.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x300?text=Product+Image";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The upload was refused, e.g. because the path names no object.
    #[error("upload to {path} failed: {reason}")]
    UploadFailed { path: String, reason: String },

    /// No object exists at the reference.
    #[error("object not found: {0}")]
    NotFound(String),
}

/// Reference to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Path the object was stored under, used to resolve its URL.
    pub full_path: String,
}

/// In-process stand-in for a hosted blob store.
#[derive(Debug)]
pub struct StorageEmulator {
    uploaded: Mutex<BTreeSet<String>>,
    latency: LatencyProfile,
}

impl StorageEmulator {
    #[must_use]
    pub const fn new(latency: LatencyProfile) -> Self {
        Self {
            uploaded: Mutex::new(BTreeSet::new()),
            latency,
        }
    }

    fn accept(&self, path: &str) -> Result<UploadResult, StorageError> {
        let full_path = path.trim().trim_matches('/');
        if full_path.is_empty() || full_path.split('/').any(|segment| segment.trim().is_empty()) {
            return Err(StorageError::UploadFailed {
                path: path.to_string(),
                reason: "path must name an object".to_string(),
            });
        }

        self.uploaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(full_path.to_string());
        debug!(path = %full_path, "Upload accepted, payload discarded");
        Ok(UploadResult {
            full_path: full_path.to_string(),
        })
    }

    fn resolve(&self, full_path: &str) -> Result<String, StorageError> {
        let known = self
            .uploaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(full_path);
        if !known {
            return Err(StorageError::NotFound(full_path.to_string()));
        }
        debug!(path = %full_path, "Resolving placeholder URL");
        Ok(PLACEHOLDER_IMAGE_URL.to_string())
    }
}

#[async_trait]
impl BlobStorage for StorageEmulator {
    #[instrument(skip(self, path, payload), fields(path = %path, bytes = payload.len()))]
    async fn upload(&self, path: &str, payload: Vec<u8>) -> Result<UploadResult, StorageError> {
        remote_call(self.latency.upload, || self.accept(path)).await
    }

    async fn download_url(&self, full_path: &str) -> Result<String, StorageError> {
        remote_call(self.latency.resolve_url, || self.resolve(full_path)).await
    }
}
