//! Authentication emulator.
//!
//! Accounts live in the shared account collection, keyed by email. The
//! current session is persisted on every change, so it survives a restart,
//! and every change is pushed to the registered session listeners before the
//! operation resolves.
//!
//! Session transitions are serialised: the persisted session and the order
//! in which listeners observe changes always agree. Listeners run while the
//! transition is held, so a listener must not sign in, sign out or register
//! another listener synchronously.

mod error;
mod listeners;

pub use error::AuthError;

use std::sync::{Arc, Mutex, PoisonError};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use nebula_core::{AccountId, Email};

use crate::backend::{AuthBackend, SessionListener, Subscription};
use crate::db::StoreCollections;
use crate::models::{Account, Session};
use crate::services::latency::LatencyProfile;

use listeners::SessionListeners;

/// In-process stand-in for a hosted auth service.
pub struct AuthEmulator {
    collections: Arc<StoreCollections>,
    listeners: SessionListeners,
    /// Held across a session change and its notification, and across a
    /// registration and its replay.
    transition: Mutex<()>,
    latency: LatencyProfile,
}

impl AuthEmulator {
    /// Create an emulator over `collections`. The last persisted session, if
    /// any, is the current session.
    #[must_use]
    pub fn new(collections: Arc<StoreCollections>, latency: LatencyProfile) -> Self {
        Self {
            collections,
            listeners: SessionListeners::default(),
            transition: Mutex::new(()),
            latency,
        }
    }

    fn set_session(&self, session: Option<Session>) {
        let _transition = self.transition.lock().unwrap_or_else(PoisonError::into_inner);
        self.collections
            .session
            .mutate(|current| current.clone_from(&session));
        self.listeners.notify(session.as_ref());
    }
}

#[async_trait]
impl AuthBackend for AuthEmulator {
    /// Register a new account with email and password and sign into it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::DuplicateAccount` if the email is already registered.
    #[instrument(skip(self, email, password), fields(email = %email))]
    async fn sign_up(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;
        self.latency.auth.wait().await;

        if self.collections.accounts.read(|accounts| accounts.contains(&email)) {
            return Err(AuthError::DuplicateAccount);
        }

        let account = Account {
            id: AccountId::generate(),
            email,
            password_hash: hash_password(password.expose_secret())?,
            name: String::new(),
            phone: String::new(),
        };
        let session = Session::from(&account);

        // Re-checked under the lock: a concurrent sign-up may have won.
        if !self.collections.accounts.mutate(|accounts| accounts.insert(account)) {
            return Err(AuthError::DuplicateAccount);
        }

        self.set_session(Some(session.clone()));
        info!(uid = %session.uid, "Account created");
        Ok(session)
    }

    /// Sign into an existing account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountNotFound` if no account has this email.
    /// Returns `AuthError::InvalidCredential` if the password does not match.
    #[instrument(skip(self, email, password), fields(email = %email))]
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;
        self.latency.auth.wait().await;

        let (session, password_hash) = self
            .collections
            .accounts
            .read(|accounts| {
                accounts
                    .get(&email)
                    .map(|account| (Session::from(account), account.password_hash.clone()))
            })
            .ok_or(AuthError::AccountNotFound)?;

        verify_password(password.expose_secret(), &password_hash)?;

        self.set_session(Some(session.clone()));
        info!(uid = %session.uid, "Signed in");
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), AuthError> {
        self.latency.sign_out.wait().await;
        self.set_session(None);
        info!("Signed out");
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.collections.session.snapshot()
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        let _transition = self.transition.lock().unwrap_or_else(PoisonError::into_inner);
        let subscription = self.listeners.register(Arc::clone(&listener));
        listeners::invoke(&listener, self.current_session().as_ref());
        subscription
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC string.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredential)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredential)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::db::{BackingStore, MemoryBackingStore};

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn emulator(store: &MemoryBackingStore) -> AuthEmulator {
        let store: Arc<dyn BackingStore> = Arc::new(store.clone());
        AuthEmulator::new(
            Arc::new(StoreCollections::load(&store)),
            LatencyProfile::instant(),
        )
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in_same_account() {
        let auth = emulator(&MemoryBackingStore::new());

        let created = auth.sign_up("ada@nebula.test", &secret("hunter22")).await.unwrap();
        auth.sign_out().await.unwrap();
        let signed_in = auth.sign_in("ada@nebula.test", &secret("hunter22")).await.unwrap();

        assert_eq!(created.uid, signed_in.uid);
        assert_eq!(auth.current_session(), Some(signed_in));
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_keeps_existing_account() {
        let store = MemoryBackingStore::new();
        let auth = emulator(&store);
        let first = auth.sign_up("ada@nebula.test", &secret("first")).await.unwrap();

        let err = auth.sign_up("ada@nebula.test", &secret("second")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateAccount));

        auth.sign_in("ada@nebula.test", &secret("first")).await.unwrap();
        assert_eq!(auth.current_session().unwrap().uid, first.uid);
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_session_unchanged() {
        let auth = emulator(&MemoryBackingStore::new());
        auth.sign_up("ada@nebula.test", &secret("right")).await.unwrap();
        let before = auth.current_session();

        let err = auth.sign_in("ada@nebula.test", &secret("wrong")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredential));
        assert_eq!(auth.current_session(), before);

        auth.sign_out().await.unwrap();
        let err = auth.sign_in("ada@nebula.test", &secret("wrong")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredential));
        assert!(auth.current_session().is_none());
    }

    #[tokio::test]
    async fn test_unknown_email_is_account_not_found() {
        let auth = emulator(&MemoryBackingStore::new());
        let err = auth.sign_in("nobody@nebula.test", &secret("x")).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountNotFound));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let auth = emulator(&MemoryBackingStore::new());
        let err = auth.sign_up("not-an-email", &secret("x")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }

    #[tokio::test]
    async fn test_password_is_not_stored_in_clear() {
        let store = MemoryBackingStore::new();
        let auth = emulator(&store);
        auth.sign_up("ada@nebula.test", &secret("hunter22")).await.unwrap();

        let bytes = store.load(crate::db::blobs::ACCOUNTS).unwrap().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("hunter22"));
        assert!(text.contains("$argon2"));
    }

    #[tokio::test]
    async fn test_late_listener_sees_current_session() {
        let auth = emulator(&MemoryBackingStore::new());
        let session = auth.sign_up("ada@nebula.test", &secret("pw")).await.unwrap();

        let seen: Arc<Mutex<Vec<Option<Session>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = auth.on_session_change(Arc::new(move |s| sink.lock().unwrap().push(s.cloned())));

        assert_eq!(*seen.lock().unwrap(), vec![Some(session)]);
    }

    #[tokio::test]
    async fn test_listeners_follow_every_change_until_unsubscribed() {
        let auth = emulator(&MemoryBackingStore::new());
        let seen: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = auth.on_session_change(Arc::new(move |s| sink.lock().unwrap().push(s.is_some())));

        auth.sign_up("ada@nebula.test", &secret("pw")).await.unwrap();
        auth.sign_out().await.unwrap();
        sub.unsubscribe();
        auth.sign_in("ada@nebula.test", &secret("pw")).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![false, true, false]);
    }

    #[tokio::test]
    async fn test_panicking_listener_does_not_fail_sign_in() {
        let auth = emulator(&MemoryBackingStore::new());
        auth.sign_up("ada@nebula.test", &secret("pw")).await.unwrap();

        let _sub = auth.on_session_change(Arc::new(|_| panic!("listener failure")));
        let session = auth.sign_in("ada@nebula.test", &secret("pw")).await.unwrap();
        assert_eq!(auth.current_session(), Some(session));
    }

    #[tokio::test]
    async fn test_session_restored_after_restart() {
        let store = MemoryBackingStore::new();
        let session = emulator(&store)
            .sign_up("ada@nebula.test", &secret("pw"))
            .await
            .unwrap();

        let restarted = emulator(&store);
        assert_eq!(restarted.current_session(), Some(session));
        restarted.sign_in("ada@nebula.test", &secret("pw")).await.unwrap();
    }

    #[test]
    fn test_listeners_agree_with_session_under_concurrent_changes() {
        fn block_on<F: std::future::Future>(future: F) -> F::Output {
            tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap()
                .block_on(future)
        }

        let auth = Arc::new(emulator(&MemoryBackingStore::new()));
        block_on(auth.sign_up("ada@nebula.test", &secret("pw"))).unwrap();
        block_on(auth.sign_out()).unwrap();

        // The listener stalls on the first signed-in notification until
        // released, leaving a window for a concurrent sign-out.
        let (entered_tx, entered_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let release_rx = Mutex::new(Some(release_rx));
        let last_seen: Arc<Mutex<Option<Session>>> = Arc::default();
        let sink = Arc::clone(&last_seen);
        let _sub = auth.on_session_change(Arc::new(move |session: Option<&Session>| {
            let release = if session.is_some() {
                release_rx.lock().unwrap().take()
            } else {
                None
            };
            if let Some(release) = release {
                entered_tx.send(()).unwrap();
                release.recv().unwrap();
            }
            *sink.lock().unwrap() = session.cloned();
        }));

        let signer = Arc::clone(&auth);
        let sign_in = thread::spawn(move || {
            block_on(signer.sign_in("ada@nebula.test", &secret("pw"))).unwrap();
        });
        entered_rx.recv().unwrap();

        let leaver = Arc::clone(&auth);
        let sign_out = thread::spawn(move || block_on(leaver.sign_out()).unwrap());
        thread::sleep(Duration::from_millis(100));
        release_tx.send(()).unwrap();

        sign_in.join().unwrap();
        sign_out.join().unwrap();

        assert_eq!(*last_seen.lock().unwrap(), auth.current_session());
        assert!(auth.current_session().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_waits_for_auth_latency() {
        let store: Arc<dyn BackingStore> = Arc::new(MemoryBackingStore::new());
        let auth = AuthEmulator::new(
            Arc::new(StoreCollections::load(&store)),
            LatencyProfile::realistic(),
        );

        let start = tokio::time::Instant::now();
        auth.sign_up("ada@nebula.test", &secret("pw")).await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(500));
    }
}
