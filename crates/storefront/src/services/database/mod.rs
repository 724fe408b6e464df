//! Document database emulator.
//!
//! Path-addressed reads and writes over the shared collections. Only four
//! kinds of path are backed by storage (see [`DocumentPath`]); anything else
//! reads as absent and swallows writes, which is what a schemaless hosted
//! database looks like to a client that never wrote there.
//!
//! Subscriptions are single-shot: the callback receives one snapshot after
//! a short delay and never fires again, even if the data changes.

mod error;
mod path;

pub use error::DatabaseError;
pub use path::DocumentPath;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use nebula_core::{AccountId, ProductId};

use crate::backend::{DocumentDatabase, SnapshotCallback, Subscription};
use crate::db::StoreCollections;
use crate::models::{ChatMessage, Order, ProductDraft, ProfileUpdate};
use crate::services::latency::{LatencyProfile, remote_call};

/// Value read from one path. `value` is `None` when nothing is stored there.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSnapshot {
    pub path: String,
    pub value: Option<Value>,
}

impl DataSnapshot {
    /// A snapshot with nothing at `path`.
    #[must_use]
    pub fn absent(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: None,
        }
    }

    /// The raw value, if any.
    #[must_use]
    pub const fn val(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether anything is stored at the path.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// Decode the value into `T`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidPayload` if the value does not decode.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Option<T>, DatabaseError> {
        self.value
            .clone()
            .map(|value| decode(&self.path, value))
            .transpose()
    }
}

/// In-process stand-in for a hosted document database.
pub struct DatabaseEmulator {
    collections: Arc<StoreCollections>,
    latency: LatencyProfile,
}

impl DatabaseEmulator {
    #[must_use]
    pub const fn new(collections: Arc<StoreCollections>, latency: LatencyProfile) -> Self {
        Self {
            collections,
            latency,
        }
    }

    fn signed_in_as(&self, id: &AccountId) -> bool {
        self.collections
            .session
            .read(|session| session.as_ref().is_some_and(|s| &s.uid == id))
    }

    fn read_now(&self, path: &DocumentPath) -> Result<Option<Value>, DatabaseError> {
        let raw = path.to_string();
        match path {
            DocumentPath::AccountProfile(id) => {
                if !self.signed_in_as(id) {
                    debug!(path = %raw, "Profile read by another account, returning nothing");
                    return Ok(None);
                }
                self.collections
                    .accounts
                    .read(|accounts| accounts.find_by_id(id).map(|a| a.profile()))
                    .map(|profile| encode(&raw, &profile))
                    .transpose()
            }
            DocumentPath::Products => {
                let products = self.collections.products.snapshot();
                encode(&raw, &products).map(Some)
            }
            DocumentPath::ChatTranscript => {
                let transcript = self.collections.chat.snapshot();
                encode(&raw, &transcript).map(Some)
            }
            DocumentPath::Order(id) => self
                .collections
                .orders
                .read(|orders| orders.iter().find(|o| &o.id == id).cloned())
                .map(|order| encode(&raw, &order))
                .transpose(),
            DocumentPath::Unrecognized(_) => {
                debug!(path = %raw, "Read of unrecognized path");
                Ok(None)
            }
        }
    }

    fn write_now(&self, path: &DocumentPath, value: Value) -> Result<(), DatabaseError> {
        let raw = path.to_string();
        match path {
            DocumentPath::AccountProfile(id) => {
                let update: ProfileUpdate = decode(&raw, value)?;
                if !self.signed_in_as(id) {
                    warn!(path = %raw, "Profile write by another account ignored");
                    return Ok(());
                }
                let applied = self.collections.accounts.mutate(|accounts| {
                    let Some(account) = accounts.find_by_id_mut(id) else {
                        return false;
                    };
                    account.apply(update);
                    true
                });
                if applied {
                    info!(path = %raw, "Profile updated");
                } else {
                    warn!(path = %raw, "Profile write for missing account ignored");
                }
                Ok(())
            }
            DocumentPath::ChatTranscript => {
                let transcript: Vec<ChatMessage> = decode(&raw, value)?;
                self.collections
                    .chat
                    .mutate(|chat| *chat = transcript);
                Ok(())
            }
            DocumentPath::Order(id) => {
                let mut order: Order = decode(&raw, value)?;
                order.id = id.clone();
                self.collections.orders.mutate(|orders| {
                    if orders.iter().any(|o| o.id == order.id) {
                        return Err(DatabaseError::OrderExists(order.id.clone()));
                    }
                    orders.push(order);
                    Ok(())
                })?;
                info!(path = %raw, "Order stored");
                Ok(())
            }
            DocumentPath::Products | DocumentPath::Unrecognized(_) => {
                warn!(path = %raw, "Write to unmodeled path dropped");
                Ok(())
            }
        }
    }

    fn append_now(&self, path: &DocumentPath, value: Value) -> Result<String, DatabaseError> {
        let raw = path.to_string();
        if *path != DocumentPath::Products {
            warn!(path = %raw, "Append to unmodeled path dropped");
            return Ok(nebula_core::random_suffix());
        }

        let draft: ProductDraft = decode(&raw, value)?;
        let id = ProductId::generate();
        let product = draft.into_product(id.clone());
        self.collections.products.mutate(|products| products.push(product));

        info!(product_id = %id, "Product appended");
        Ok(id.into_inner())
    }
}

#[async_trait]
impl DocumentDatabase for DatabaseEmulator {
    #[instrument(skip(self, path), fields(path = %path))]
    async fn read(&self, path: &str) -> Result<DataSnapshot, DatabaseError> {
        let target = DocumentPath::parse(path);
        let value = remote_call(self.latency.database, || self.read_now(&target)).await?;
        Ok(DataSnapshot {
            path: target.to_string(),
            value,
        })
    }

    #[instrument(skip(self, path, value), fields(path = %path))]
    async fn write(&self, path: &str, value: Value) -> Result<(), DatabaseError> {
        let target = DocumentPath::parse(path);
        remote_call(self.latency.database, || self.write_now(&target, value)).await
    }

    #[instrument(skip(self, path, value), fields(path = %path))]
    async fn append(&self, path: &str, value: Value) -> Result<String, DatabaseError> {
        let target = DocumentPath::parse(path);
        remote_call(self.latency.append, || self.append_now(&target, value)).await
    }

    fn subscribe(&self, path: &str, callback: SnapshotCallback) -> Subscription {
        let target = DocumentPath::parse(path);
        let collections = Arc::clone(&self.collections);
        let delay = self.latency.subscribe;

        let deliver = move || {
            let raw = target.to_string();
            let snapshot = if target == DocumentPath::Products {
                let products = collections.products.snapshot();
                DataSnapshot {
                    value: encode(&raw, &products).ok(),
                    path: raw,
                }
            } else {
                DataSnapshot::absent(raw)
            };
            callback(snapshot);
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(remote_call(delay, deliver));
            }
            Err(_) => {
                debug!(path = %path, "No async runtime, delivering from a thread");
                std::thread::spawn(move || {
                    std::thread::sleep(delay.sample());
                    deliver();
                });
            }
        }

        Subscription::noop()
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, DatabaseError> {
    serde_json::from_value(value).map_err(|source| DatabaseError::InvalidPayload {
        path: path.to_string(),
        source,
    })
}

fn encode<T: Serialize>(path: &str, value: &T) -> Result<Value, DatabaseError> {
    serde_json::to_value(value).map_err(|source| DatabaseError::InvalidPayload {
        path: path.to_string(),
        source,
    })
}
