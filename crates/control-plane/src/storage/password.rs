// Password hashing using Argon2id
// Decision: Credentials are always compared hashed; plain equality is never used
// Decision: Use default parameters which are secure for most use cases

use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use eventdesk_core::{DomainError, PasswordEncoder};

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;

    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// PasswordEncoder backed by Argon2id PHC strings
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, plain: &str) -> eventdesk_core::Result<String> {
        hash_password(plain).map_err(DomainError::Internal)
    }

    fn matches(&self, plain: &str, encoded: &str) -> bool {
        match verify_password(plain, encoded) {
            Ok(valid) => valid,
            Err(e) => {
                // Stored value is not a PHC string; treat as mismatch
                tracing::warn!("Password verification failed: {}", e);
                false
            }
        }
    }
}
