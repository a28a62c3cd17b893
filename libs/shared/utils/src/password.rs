use std::sync::OnceLock;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::{instrument, warn};

use shared_models::error::AppError;

/// Salted argon2 hash in PHC string format.
#[instrument(skip(password))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// A malformed stored hash never verifies.
#[instrument(skip(hash, password))]
pub fn verify_password(hash: &str, password: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("clinic-unknown-account").ok())
        .as_deref()
}

/// Spends one argon2 verification for a login whose account does not exist,
/// so it takes as long as a wrong password. Always false.
#[instrument(skip(password))]
pub fn verify_dummy_password(password: &str) -> bool {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(hash, password);
    }
    false
}
