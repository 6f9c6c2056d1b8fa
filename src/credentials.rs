use std::sync::Arc;

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

/// Hashes and checks account passwords.
///
/// Kept apart from `User` so the hashing algorithm can change without
/// touching the entity; the stored value is a self-describing PHC string.
#[derive(Clone, Default)]
pub struct CredentialService {
    hasher: Arc<Argon2<'static>>,
}

impl CredentialService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(&self, secret: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| anyhow!("failed to hash password: {e}"))?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` for a wrong secret; `Err` only if `stored_hash` is not a
    /// parseable PHC string.
    pub fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| anyhow!("stored password hash is malformed: {e}"))?;
        Ok(self
            .hasher
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok())
    }
}
