//! Argon2id password hashing.
//!
//! Hashes use the Argon2id variant with a random salt from [`OsRng`] and
//! are stored in PHC string format, so parameters and salt travel with the
//! hash. Nothing in the API verifies passwords yet; sellers have no login.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;

use crate::error::{AppError, AppResult};

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Hash off the async executor; Argon2 is deliberately slow.
pub async fn hash_password_blocking(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::InternalError(format!("password hashing task failed: {e}")))?
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))
}
