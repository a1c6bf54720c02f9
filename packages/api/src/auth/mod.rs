//! Authentication: the gateway trait, local credential checks, password hashing,
//! and an in-memory identity provider.

mod error;
mod gateway;
mod memory;
mod password;
mod validate;

pub use error::AuthError;
pub use gateway::{AuthGateway, SessionListener};
pub use memory::MemoryAuthProvider;
pub use password::{
    hash_password, hash_password_with, lightweight_hasher, verify_password, verify_password_with,
};
pub use validate::validate_credentials;
