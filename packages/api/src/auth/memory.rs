//! # In-memory identity provider
//!
//! [`MemoryAuthProvider`] implements [`AuthGateway`] without a network. Accounts
//! are keyed by normalized email and store an Argon2id hash, never the password.
//! It models the parts of a hosted provider the client depends on:
//!
//! - `register` creates the account and signs it in.
//! - The single session listener is told about every change, and receives the
//!   current session as soon as it is registered.
//! - [`set_offline`](MemoryAuthProvider::set_offline) makes every operation fail
//!   with `ProviderUnavailable`.
//! - [`expire_session`](MemoryAuthProvider::expire_session) drops the session the
//!   way a revoked or expired token would.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use argon2::Argon2;
use store::{ClientConfig, SubscriptionHandle, SubscriptionId};

use super::gateway::{AuthGateway, SessionListener};
use super::password::{hash_password_with, lightweight_hasher, verify_password_with};
use super::validate::validate_credentials;
use super::AuthError;
use crate::models::Identity;

#[derive(Clone, Debug)]
struct Account {
    user_id: String,
    email: String,
    password_hash: String,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    session: Option<Identity>,
    listener: Option<(SubscriptionId, Arc<SessionListener>)>,
    offline: bool,
}

/// In-process AuthGateway for tests and offline use.
#[derive(Clone)]
pub struct MemoryAuthProvider {
    inner: Arc<Mutex<Inner>>,
    hasher: Argon2<'static>,
    min_password_len: usize,
}

impl std::fmt::Debug for MemoryAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("MemoryAuthProvider")
            .field("accounts", &inner.accounts.len())
            .field("session", &inner.session)
            .field("offline", &inner.offline)
            .finish()
    }
}

impl MemoryAuthProvider {
    pub fn new() -> Result<Self, AuthError> {
        Self::from_config(&ClientConfig::default())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, AuthError> {
        let hasher = lightweight_hasher().map_err(AuthError::ProviderUnavailable)?;
        Ok(Self {
            inner: Arc::default(),
            hasher,
            min_password_len: config.auth.min_password_len,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_online(&self) -> Result<(), AuthError> {
        if self.lock().offline {
            Err(AuthError::ProviderUnavailable("network unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    /// Set the session and tell the listener, outside the lock.
    fn publish(&self, session: Option<Identity>) {
        let listener = {
            let mut inner = self.lock();
            inner.session = session.clone();
            inner.listener.as_ref().map(|(_, l)| l.clone())
        };
        if let Some(listener) = listener {
            listener(session);
        }
    }

    /// Simulate losing (or regaining) connectivity to the provider.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Drop the current session as if the provider revoked it.
    pub fn expire_session(&self) {
        let expired = self.lock().session.take();
        if let Some(identity) = expired {
            tracing::info!(user_id = %identity.user_id, "session expired by provider");
            self.publish(None);
        }
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.lock().session.clone()
    }

    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }

    pub fn has_listener(&self) -> bool {
        self.lock().listener.is_some()
    }
}

impl AuthGateway for MemoryAuthProvider {
    async fn register(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = validate_credentials(email, password, self.min_password_len)?;
        self.ensure_online()?;

        let password_hash =
            hash_password_with(&self.hasher, password).map_err(AuthError::ProviderUnavailable)?;

        let identity = {
            let mut inner = self.lock();
            if inner.accounts.contains_key(&email) {
                return Err(AuthError::AccountAlreadyExists);
            }
            let account = Account {
                user_id: uuid::Uuid::new_v4().to_string(),
                email: email.clone(),
                password_hash,
            };
            let identity = Identity::new(account.user_id.clone(), account.email.clone());
            inner.accounts.insert(email, account);
            identity
        };

        tracing::info!(user_id = %identity.user_id, "account registered");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.ensure_online()?;

        let email = email.trim().to_lowercase();
        let account = self
            .lock()
            .accounts
            .get(&email)
            .cloned()
            .ok_or(AuthError::AccountNotFound)?;

        let matches = verify_password_with(&self.hasher, password, &account.password_hash)
            .map_err(AuthError::ProviderUnavailable)?;
        if !matches {
            tracing::debug!(user_id = %account.user_id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let identity = Identity::new(account.user_id, account.email);
        tracing::info!(user_id = %identity.user_id, "signed in");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.ensure_online()?;
        let had_session = self.lock().session.is_some();
        if had_session {
            self.publish(None);
        }
        Ok(())
    }

    fn on_session_change(&self, listener: SessionListener) -> SubscriptionHandle {
        let id = SubscriptionId::next();
        let listener = Arc::new(listener);

        let current = {
            let mut inner = self.lock();
            if let Some((previous, _)) = inner.listener.replace((id, listener.clone())) {
                tracing::debug!(listener = %previous, "replacing session listener");
            }
            inner.session.clone()
        };
        listener(current);

        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        SubscriptionHandle::new(id, move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                if inner.listener.as_ref().is_some_and(|(current, _)| *current == id) {
                    inner.listener = None;
                }
            }
        })
    }
}
