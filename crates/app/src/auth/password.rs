//! Password hashing.
//!
//! Argon2 is CPU-bound, so hashing and verification run on the blocking pool.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tokio::task::{JoinError, spawn_blocking};
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("password task failed")]
    Task(#[from] JoinError),
}

/// Hash `password` into a PHC string.
pub(crate) async fn hash_password(password: Zeroizing<String>) -> Result<String, PasswordError> {
    spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    })
    .await?
}

/// Check `password` against a stored PHC string. Malformed hashes never verify.
pub(crate) async fn verify_password(
    password: Zeroizing<String>,
    password_hash: String,
) -> Result<bool, PasswordError> {
    let verified = spawn_blocking(move || {
        PasswordHash::new(&password_hash).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    })
    .await?;

    Ok(verified)
}
