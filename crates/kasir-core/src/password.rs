//! # Password Hashing
//!
//! Argon2id with a random salt, stored as a PHC string.
//! Hashing is CPU-bound; async callers should move it off the runtime
//! threads with `spawn_blocking`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to hash password: {0}")]
pub struct PasswordError(String);

/// Hashes a plaintext password for storage.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError(e.to_string()))
}

/// Checks a plaintext password against a stored hash.
///
/// A malformed stored hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
