//! Credential hashing using argon2
//!
//! Digests are Argon2id PHC strings with a random per-password salt, so two
//! hashes of the same password never compare equal and the digest carries its
//! own parameters.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::warn;

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password (blocking, CPU-heavy)
    ///
    /// From async code use [`PasswordService::hash_async`].
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(digest.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Check a password against a stored digest
    ///
    /// A digest that does not parse is treated as a mismatch.
    pub fn verify(password: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Stored password digest is malformed: {}", e);
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Check a password on the blocking thread pool
    pub async fn verify_async(password: String, digest: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &digest))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}
