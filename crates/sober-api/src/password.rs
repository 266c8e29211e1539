use argon2::password_hash::{self, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::LazyLock;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Hash with Argon2id and a fresh random salt. The PHC output embeds the
/// algorithm, cost parameters and salt.
pub fn hash_password(plaintext: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hashing(e.to_string()))
}

/// `Ok(false)` on mismatch; an error only when `hash` cannot be parsed.
pub fn verify_password(hash: &str, plaintext: &str) -> Result<bool, CredentialError> {
    let parsed = PasswordHash::new(hash).map_err(|_| CredentialError::MalformedHash)?;

    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(_) => Err(CredentialError::MalformedHash),
    }
}

/// Hash checked when no account matches, so a miss costs the same Argon2
/// work as a wrong password.
static PLACEHOLDER_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("sober-placeholder-password").ok());

/// Runs a full verify against a placeholder hash. Always `false`.
pub fn verify_placeholder(plaintext: &str) -> bool {
    if let Some(hash) = PLACEHOLDER_HASH.as_deref() {
        let _ = verify_password(hash, plaintext);
    }
    false
}
