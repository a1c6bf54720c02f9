//! # AuthGateway — the client's view of the hosted identity provider
//!
//! | Method | Fails with |
//! |--------|-----------|
//! | [`register`](AuthGateway::register) | `InvalidCredentialsFormat`, `AccountAlreadyExists`, `ProviderUnavailable` |
//! | [`sign_in`](AuthGateway::sign_in) | `InvalidCredentials`, `AccountNotFound`, `ProviderUnavailable` |
//! | [`sign_out`](AuthGateway::sign_out) | `ProviderUnavailable` (callers treat sign-out as best-effort) |
//!
//! Session state reaches the client only through the listener registered with
//! [`on_session_change`](AuthGateway::on_session_change). It fires on every change
//! the provider observes, including ones the client did not initiate such as
//! token expiry. A gateway keeps at most one listener; registering a new one
//! replaces the old.

use std::future::Future;

use store::SubscriptionHandle;

use super::AuthError;
use crate::models::Identity;

/// Invoked with the new session identity, or `None` once signed out.
pub type SessionListener = Box<dyn Fn(Option<Identity>) + Send + Sync>;

pub trait AuthGateway {
    fn register(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, AuthError>>;

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, AuthError>>;

    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>>;

    fn on_session_change(&self, listener: SessionListener) -> SubscriptionHandle;
}
