//! Scenario tests for Nebula.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nebula-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Sign up, fill the cart, place an order
//! - `persistence` - State surviving a simulated process restart
//! - `session_listeners` - Session change fan-out
//! - `marketplace_flow` - Selling, browsing and support chat
//!
//! Every scenario runs against a file backing store in a temporary
//! directory. "Restarting" means building a fresh [`AppState`] over the same
//! directory.

use std::path::Path;
use std::sync::Arc;

use secrecy::SecretString;
use tempfile::TempDir;

use nebula_core::Price;
use nebula_storefront::db::{BackingStore, FileBackingStore};
use nebula_storefront::models::{Product, ProductDraft, Session};
use nebula_storefront::services::latency::LatencyProfile;
use nebula_storefront::{AppError, AppState, StorefrontConfig};

/// A temporary data directory and the app state running over it.
pub struct TestContext {
    dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    /// Fresh state over an empty temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let state = start(dir.path())?;
        Ok(Self { dir, state })
    }

    /// Simulate a process restart: drop the state and load it again from
    /// the same directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be rebuilt.
    pub fn restart(&mut self) -> Result<(), AppError> {
        self.state = start(self.dir.path())?;
        Ok(())
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Sign up `email` with a fixed test password.
    ///
    /// # Errors
    ///
    /// Returns the auth failure.
    pub async fn sign_up(&self, email: &str) -> Result<Session, AppError> {
        Ok(self
            .state
            .backend()
            .auth
            .sign_up(email, &password())
            .await?)
    }

    /// List a product with just a name and price as the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns the catalog failure.
    pub async fn list(&self, name: &str, price: i64) -> Result<Product, AppError> {
        let session = self.state.session();
        Ok(self
            .state
            .catalog()
            .list_product(session.as_ref(), ProductDraft::new(name, Price::from(price)), None)
            .await?)
    }
}

/// The password every test account uses.
#[must_use]
pub fn password() -> SecretString {
    SecretString::from("correct horse battery staple".to_string())
}

fn start(dir: &Path) -> Result<AppState, AppError> {
    let config = StorefrontConfig {
        data_dir: Some(dir.to_path_buf()),
        latency: LatencyProfile::instant(),
        ..StorefrontConfig::default()
    };
    let store: Arc<dyn BackingStore> = Arc::new(FileBackingStore::new(dir));
    Ok(AppState::with_store(config, &store)?)
}
