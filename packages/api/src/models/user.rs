//! # Authenticated identity
//!
//! [`Identity`] is what the identity provider hands back after a successful
//! registration or sign-in: an opaque `user_id` and the account email. It lives
//! for the duration of a session and is discarded on sign-out or when the
//! provider expires the session on its own.
//!
//! The `user_id` is the value every note's owner field is compared against.

use serde::{Deserialize, Serialize};

/// The authenticated principal of the current session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }

    /// Name shown in the greeting. Accounts only carry an email.
    pub fn display_name(&self) -> &str {
        &self.email
    }
}
