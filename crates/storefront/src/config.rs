//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//! - `NEBULA_BACKEND` - `emulator` (default) or `remote`
//! - `NEBULA_DATA_DIR` - Directory for persisted state. Unset means nothing
//!   is persisted and every run starts empty.
//! - `NEBULA_LATENCY` - `realistic` (default) or `instant`
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::backend::BackendKind;
use crate::db::{BackingStore, FileBackingStore, NullBackingStore};
use crate::services::latency::LatencyProfile;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Backend '{0}' is not available in this build")]
    UnsupportedBackend(BackendKind),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Which backend to talk to
    pub backend: BackendKind,
    /// Where persisted state lives, if anywhere
    pub data_dir: Option<PathBuf>,
    /// Simulated latency for emulated remote calls
    pub latency: LatencyProfile,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Emulator,
            data_dir: None,
            latency: LatencyProfile::realistic(),
            sentry_dsn: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or names a backend
    /// this build cannot reach.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = get_env_or_default(&lookup, "NEBULA_BACKEND", "emulator")
            .parse::<BackendKind>()
            .map_err(|e| ConfigError::InvalidEnvVar("NEBULA_BACKEND".to_string(), e))?;
        if backend != BackendKind::Emulator {
            return Err(ConfigError::UnsupportedBackend(backend));
        }

        let data_dir = get_optional_env(&lookup, "NEBULA_DATA_DIR").map(PathBuf::from);
        let latency = parse_latency(&get_env_or_default(&lookup, "NEBULA_LATENCY", "realistic"))?;
        let sentry_dsn = get_optional_env(&lookup, "SENTRY_DSN");

        Ok(Self {
            backend,
            data_dir,
            latency,
            sentry_dsn,
        })
    }

    /// The backing store `data_dir` points at.
    #[must_use]
    pub fn backing_store(&self) -> Arc<dyn BackingStore> {
        match &self.data_dir {
            Some(dir) => Arc::new(FileBackingStore::new(dir)),
            None => Arc::new(NullBackingStore),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable. Blank values count as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

fn parse_latency(value: &str) -> Result<LatencyProfile, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "realistic" => Ok(LatencyProfile::realistic()),
        "instant" | "none" => Ok(LatencyProfile::instant()),
        other => Err(ConfigError::InvalidEnvVar(
            "NEBULA_LATENCY".to_string(),
            format!("expected 'realistic' or 'instant', got '{other}'"),
        )),
    }
}
