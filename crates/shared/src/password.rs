//! Password hashing with Argon2id.
//!
//! Callers supply a server-side pepper which is appended to the plaintext
//! before hashing and before verification. An empty pepper is allowed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// 19 MiB, 2 passes, single lane, 256-bit output.
const MEMORY_COST_KIB: u32 = 19456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|e| PasswordError::HashError(format!("Failed to create Argon2 params: {}", e)))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn peppered(password: &str, pepper: &str) -> String {
    format!("{}{}", password, pepper)
}

/// Hashes `password` + `pepper`, returning a PHC string.
///
/// ```
/// use shared::password::hash_password;
///
/// let hash = hash_password("correct horse", "pepper").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str, pepper: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(peppered(password, pepper).as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies `password` + `pepper` against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch and `Err` only when the stored hash is unusable.
pub fn verify_password(password: &str, pepper: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    // Parameters are read from the PHC string itself.
    match Argon2::default().verify_password(peppered(password, pepper).as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_uses_argon2id_params() {
        let hash = hash_password("admin-password", "").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same", "pep").unwrap();
        let b = hash_password("same", "pep").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_round_trip_with_pepper() {
        let hash = hash_password("s3cret-pass", "server-pepper").unwrap();
        assert!(verify_password("s3cret-pass", "server-pepper", &hash).unwrap());
        assert!(!verify_password("wrong-pass", "server-pepper", &hash).unwrap());
    }

    #[test]
    fn test_pepper_mismatch_fails_verification() {
        let hash = hash_password("s3cret-pass", "pepper-a").unwrap();
        assert!(!verify_password("s3cret-pass", "pepper-b", &hash).unwrap());
        assert!(!verify_password("s3cret-pass", "", &hash).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_unicode_password() {
        let hash = hash_password("nenosiri-siri ✓", "").unwrap();
        assert!(verify_password("nenosiri-siri ✓", "", &hash).unwrap());
    }

    #[test]
    fn test_error_display() {
        let err = PasswordError::HashError("boom".to_string());
        assert!(err.to_string().contains("boom"));
        assert_eq!(
            PasswordError::InvalidHashFormat.to_string(),
            "Invalid password hash format"
        );
    }
}
