//! # Password hashing and verification (Argon2id)
//!
//! - [`hash_password`] hashes with a random salt and the default Argon2id
//!   parameters, returning a PHC-format string (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`).
//! - [`verify_password`] checks a plaintext against a PHC-format hash. Returns
//!   `Ok(true)` on match, `Ok(false)` on mismatch, `Err` if the stored hash is malformed.
//!
//! The `_with` variants take an explicit [`Argon2`] instance so an in-process
//! provider can trade hash strength for speed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, String> {
    hash_password_with(&Argon2::default(), password)
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify_password_with(&Argon2::default(), password, hash)
}

pub fn hash_password_with(argon2: &Argon2<'_>, password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password_with(argon2: &Argon2<'_>, password: &str, hash: &str) -> Result<bool, String> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| format!("Invalid password hash: {}", e))?;
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Argon2id with minimal cost, for in-memory providers and tests.
pub fn lightweight_hasher() -> Result<Argon2<'static>, String> {
    let params = Params::new(1024, 1, 1, None).map_err(|e| format!("Invalid Argon2 params: {}", e))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}
