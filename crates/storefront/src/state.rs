//! Application state shared across front ends.

use std::sync::Arc;

use crate::backend::{Backend, BackendKind};
use crate::config::{ConfigError, StorefrontConfig};
use crate::db::{BackingStore, StoreCollections};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::Session;
use crate::services::cart::CartStore;
use crate::services::catalog::CatalogService;
use crate::services::chat::ChatService;
use crate::services::checkout::CheckoutService;

/// Application state shared across all front ends.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// backend facade, the cart and the storefront flows.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: Backend,
    cart: Arc<CartStore>,
    catalog: CatalogService,
    checkout: CheckoutService,
    chat: ChatService,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedBackend` if the configured backend
    /// is not the emulator.
    pub fn new(config: StorefrontConfig) -> Result<Self, ConfigError> {
        let store = config.backing_store();
        Self::with_store(config, &store)
    }

    /// Create a new application state over an explicit backing store.
    ///
    /// # Errors
    ///
    /// See [`AppState::new`].
    pub fn with_store(
        config: StorefrontConfig,
        store: &Arc<dyn BackingStore>,
    ) -> Result<Self, ConfigError> {
        let backend = match config.backend {
            BackendKind::Emulator => {
                Backend::emulated(Arc::new(StoreCollections::load(store)), config.latency)
            }
            other => return Err(ConfigError::UnsupportedBackend(other)),
        };

        let cart = Arc::new(CartStore::load(Arc::clone(store)));
        let catalog = CatalogService::new(Arc::clone(&backend.database), Arc::clone(&backend.storage));
        let checkout = CheckoutService::new(Arc::clone(&backend.database), Arc::clone(&cart));
        let chat = ChatService::new(Arc::clone(&backend.database));

        // Never unsubscribed: the listener lives as long as the backend.
        backend.auth.on_session_change(Arc::new(|session: Option<&Session>| {
            match session {
                Some(s) => set_sentry_user(&s.uid, Some(s.email.as_str())),
                None => clear_sentry_user(),
            }
        }));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                cart,
                catalog,
                checkout,
                chat,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend facade.
    #[must_use]
    pub fn backend(&self) -> &Backend {
        &self.inner.backend
    }

    /// The current session, if signed in.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.inner.backend.auth.current_session()
    }

    /// Get a reference to the cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the checkout flow.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    /// Get a reference to the support chat.
    #[must_use]
    pub fn chat(&self) -> &ChatService {
        &self.inner.chat
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::db::MemoryBackingStore;
    use crate::services::latency::LatencyProfile;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            latency: LatencyProfile::instant(),
            ..StorefrontConfig::default()
        }
    }

    #[test]
    fn test_remote_backend_rejected() {
        let config = StorefrontConfig {
            backend: BackendKind::Remote,
            ..config()
        };
        assert!(matches!(
            AppState::new(config).unwrap_err(),
            ConfigError::UnsupportedBackend(BackendKind::Remote)
        ));
    }

    #[tokio::test]
    async fn test_state_wires_shared_store() {
        let memory = MemoryBackingStore::new();
        let store: Arc<dyn BackingStore> = Arc::new(memory.clone());
        let state = AppState::with_store(config(), &store).unwrap();

        state
            .backend()
            .auth
            .sign_up("ada@nebula.test", &SecretString::from("pw".to_string()))
            .await
            .unwrap();

        let restarted = AppState::with_store(config(), &store).unwrap();
        assert_eq!(restarted.session(), state.session());
        assert!(restarted.catalog().list_products().await.unwrap().is_empty());
    }
}
