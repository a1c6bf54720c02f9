use thiserror::Error;

/// Failures reported by an [`AuthGateway`](super::AuthGateway).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentialsFormat(String),

    #[error("An account with this email already exists")]
    AccountAlreadyExists,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("No account found for this email")]
    AccountNotFound,

    #[error("Authentication service unavailable: {0}")]
    ProviderUnavailable(String),
}

impl AuthError {
    /// Whether the provider refused the credentials, as opposed to being unreachable
    /// or the input being malformed.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::AccountAlreadyExists | AuthError::InvalidCredentials | AuthError::AccountNotFound
        )
    }
}
