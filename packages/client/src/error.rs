//! User-visible, clearable error state.

use api::AuthError;
use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The provider refused the credentials. The session stays signed out.
    #[error("{0}")]
    AuthRejected(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    WriteRejected(String),
}

impl From<AuthError> for UiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentialsFormat(reason) => UiError::Validation(reason),
            AuthError::ProviderUnavailable(_) => UiError::Unavailable(err.to_string()),
            AuthError::AccountAlreadyExists
            | AuthError::InvalidCredentials
            | AuthError::AccountNotFound => UiError::AuthRejected(err.to_string()),
        }
    }
}

impl From<StoreError> for UiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyText => UiError::Validation(err.to_string()),
            StoreError::WriteRejected(reason) => {
                UiError::WriteRejected(format!("Failed to add note: {reason}"))
            }
        }
    }
}
