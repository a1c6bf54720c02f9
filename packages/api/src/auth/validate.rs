//! Local credential checks run before any request reaches the provider.

use super::AuthError;

/// Normalize and check an email/password pair.
///
/// Returns the trimmed, lowercased email on success.
pub fn validate_credentials(
    email: &str,
    password: &str,
    min_password_len: usize,
) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::InvalidCredentialsFormat(
            "Invalid email address".to_string(),
        ));
    };
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(AuthError::InvalidCredentialsFormat(
            "Invalid email address".to_string(),
        ));
    }

    if password.chars().count() < min_password_len {
        return Err(AuthError::InvalidCredentialsFormat(format!(
            "Password must be at least {min_password_len} characters"
        )));
    }

    Ok(email)
}
