//! Argon2id hashing and verification for batch access passwords.
//!
//! Hashes use the Argon2id variant with a random salt generated via
//! [`OsRng`] and are stored in PHC string format, so parameters and salt
//! travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum length of a batch access password.
pub const MIN_BATCH_PASSWORD_LENGTH: usize = 4;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Validate that a new batch password is long enough.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("proof-91").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"), "expected argon2id PHC prefix");
        assert!(verify_password("proof-91", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("proof-91").expect("hashing should succeed");
        assert!(!verify_password("proof-19", &hash).expect("verify should succeed"));
        assert!(!verify_password("", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("proof-91", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password_strength("abc", MIN_BATCH_PASSWORD_LENGTH).is_err());
        assert!(validate_password_strength("abcd", MIN_BATCH_PASSWORD_LENGTH).is_ok());
        let msg = validate_password_strength("", MIN_BATCH_PASSWORD_LENGTH).unwrap_err();
        assert!(msg.contains("at least 4 characters"));
    }
}
