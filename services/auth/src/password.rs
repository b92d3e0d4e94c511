//! Password hashing and verification
//!
//! New hashes are Argon2 PHC strings. Records written before Argon2 was
//! introduced hold an unsalted SHA-256 hex digest; those still verify so that
//! existing accounts keep working.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sha2::{Digest, Sha256};

use crate::error::{AuthError, AuthResult};

/// Hash a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Unsalted SHA-256 hex digest, the legacy storage format
pub fn legacy_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Verify a password against a stored hash of either format
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    if stored_hash.starts_with("$argon2") {
        return match PasswordHash::new(stored_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        };
    }

    legacy_digest(password) == stored_hash
}
