//! Identity provider access for the notes client.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | [`AuthGateway`] trait, credential validation, Argon2id password hashing, [`MemoryAuthProvider`] |
//! | [`config`] | Loads [`ClientConfig`] from `notes.toml`, `.env` and environment overrides |
//! | [`models`] | [`Identity`], the authenticated principal of a session |
//!
//! Note storage lives in the `store` crate; the types it exports that callers of
//! this crate routinely need are re-exported here.

pub mod auth;
pub mod config;
pub mod models;

pub use auth::{AuthError, AuthGateway, MemoryAuthProvider, SessionListener};
pub use config::{load_config, ConfigError};
pub use models::Identity;

pub use store::{ClientConfig, Note, SubscriptionHandle};
