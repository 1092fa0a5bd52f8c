//! Password hashing and verification
//!
//! Passwords are hashed with Argon2id and stored as self-describing PHC
//! strings, so parameters and salt travel with the hash.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Hash a password using Argon2id
///
/// A fresh random salt is generated for every call, so hashing the same
/// password twice yields different strings.
///
/// # Errors
///
/// Returns an error if hashing fails (should not happen in normal operation)
///
/// # Example
///
/// ```
/// use authgate::auth::password::hash_password;
///
/// let hash = hash_password("secret").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError::HashFailed(e.to_string()))
}

/// Verify a password against a stored hash
///
/// Returns `false` for a mismatch and for a malformed stored hash. A bad
/// hash in storage must read as a failed login, never as an error a caller
/// might surface differently.
///
/// # Example
///
/// ```
/// use authgate::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("secret").unwrap();
/// assert!(verify_password("secret", &hash));
/// assert!(!verify_password("wrong", &hash));
/// ```
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Error type for password hashing operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HashError {
    /// Hashing failed
    #[error("Hash failed: {0}")]
    HashFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: hash_password produces argon2id hash
    #[test]
    fn test_hash_password_argon2id() {
        let hash = hash_password("my_password").unwrap();

        assert!(
            hash.starts_with("$argon2id$"),
            "Hash should be in Argon2id format"
        );
    }

    // Test 2: hash_password produces different hashes for same password (due to salt)
    #[test]
    fn test_hash_password_unique_salts() {
        let hash1 = hash_password("my_password").unwrap();
        let hash2 = hash_password("my_password").unwrap();

        assert_ne!(
            hash1, hash2,
            "Same password should produce different hashes due to different salts"
        );
    }

    // Test 3: verify_password succeeds for matching password
    #[test]
    fn test_verify_password_success() {
        let hash = hash_password("my_password").unwrap();

        assert!(
            verify_password("my_password", &hash),
            "Verification should succeed"
        );
    }

    // Test 4: verify_password fails for wrong password
    #[test]
    fn test_verify_password_wrong() {
        let hash = hash_password("my_password").unwrap();

        assert!(
            !verify_password("other_password", &hash),
            "Verification should fail for wrong password"
        );
    }

    // Test 5: verify_password fails for invalid hash format
    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(
            !verify_password("my_password", "not_a_valid_hash"),
            "Verification should fail for invalid hash format"
        );
    }

    // Test 6: empty passwords still hash and verify consistently
    #[test]
    fn test_empty_password() {
        let hash = hash_password("").unwrap();

        assert!(verify_password("", &hash));
        assert!(!verify_password("x", &hash));
    }
}
