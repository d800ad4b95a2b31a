use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::errors::InternalError;

/// Hash a plaintext password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String, InternalError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| InternalError::crypto("hash_password", e.to_string()))?
        .to_string();

    Ok(hash)
}

/// Verify a plaintext password against a stored Argon2 hash
///
/// Returns `Ok(false)` on mismatch; `Err` only for malformed stored hashes.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, InternalError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| InternalError::crypto("parse_password_hash", e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
