//! Backend facade.
//!
//! Storefront code talks to three remote services - auth, a path-addressed
//! document database, and blob storage - only through the traits in this
//! module. The in-process emulators implement them; a client for a hosted
//! backend would implement the same traits and be selected at startup by
//! [`BackendKind`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;

use crate::db::StoreCollections;
use crate::models::Session;
use crate::services::auth::{AuthEmulator, AuthError};
use crate::services::database::{DataSnapshot, DatabaseEmulator, DatabaseError};
use crate::services::latency::LatencyProfile;
use crate::services::storage::{StorageEmulator, StorageError, UploadResult};

/// Callback invoked with the new session on every sign-up, sign-in and
/// sign-out. `None` means signed out.
pub type SessionListener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

/// Callback invoked with a snapshot delivered by a subscription.
pub type SnapshotCallback = Box<dyn FnOnce(DataSnapshot) + Send>;

/// Which backend implementation to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// In-process emulator persisted to the local backing store.
    #[default]
    Emulator,
    /// A hosted backend. No client for it is compiled into this build.
    Remote,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emulator" | "mock" | "local" => Ok(Self::Emulator),
            "remote" => Ok(Self::Remote),
            other => Err(format!("unknown backend: {other}")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emulator => write!(f, "emulator"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

// =============================================================================
// Service traits
// =============================================================================

/// Session lifecycle and credential checks.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Create an account and sign into it.
    async fn sign_up(&self, email: &str, password: &SecretString) -> Result<Session, AuthError>;

    /// Sign into an existing account.
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AuthError>;

    /// End the current session. Signing out while signed out succeeds.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The current session, if any.
    fn current_session(&self) -> Option<Session>;

    /// Register `listener` and immediately call it once with the current
    /// session. Listeners are notified in registration order.
    fn on_session_change(&self, listener: SessionListener) -> Subscription;
}

/// Path-addressed document reads, writes, appends and subscriptions.
#[async_trait]
pub trait DocumentDatabase: Send + Sync {
    /// Read the value at `path`. Unknown paths read as absent.
    async fn read(&self, path: &str) -> Result<DataSnapshot, DatabaseError>;

    /// Write `value` at `path`. Unknown paths accept the write without effect.
    async fn write(&self, path: &str, value: Value) -> Result<(), DatabaseError>;

    /// Append `value` to the list at `path` under a generated key.
    async fn append(&self, path: &str, value: Value) -> Result<String, DatabaseError>;

    /// Deliver the value at `path` to `callback`.
    ///
    /// Delivery is asynchronous: the callback never runs inside `subscribe`.
    /// The emulator delivers exactly one snapshot and never fires again.
    fn subscribe(&self, path: &str, callback: SnapshotCallback) -> Subscription;
}

/// Binary uploads and download URLs.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Upload `payload` to `path`.
    async fn upload(&self, path: &str, payload: Vec<u8>) -> Result<UploadResult, StorageError>;

    /// Public URL for a stored object.
    async fn download_url(&self, full_path: &str) -> Result<String, StorageError>;
}

// =============================================================================
// Subscription
// =============================================================================

/// Handle returned by listener registrations.
///
/// Dropping the handle leaves the registration in place; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// A handle that runs `cancel` when unsubscribed.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to undo.
    #[must_use]
    pub const fn noop() -> Self {
        Self { cancel: None }
    }

    /// Remove the registration.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

// =============================================================================
// Backend
// =============================================================================

/// The three services, behind trait objects.
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthBackend>,
    pub database: Arc<dyn DocumentDatabase>,
    pub storage: Arc<dyn BlobStorage>,
}

impl Backend {
    /// Wire the in-process emulators over `collections`.
    #[must_use]
    pub fn emulated(collections: Arc<StoreCollections>, latency: LatencyProfile) -> Self {
        Self {
            auth: Arc::new(AuthEmulator::new(Arc::clone(&collections), latency)),
            database: Arc::new(DatabaseEmulator::new(collections, latency)),
            storage: Arc::new(StorageEmulator::new(latency)),
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend").finish_non_exhaustive()
    }
}
