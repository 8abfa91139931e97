//! Password hashing boundary.
//!
//! Wraps the bcrypt primitive so the rest of the crate never touches the
//! hashing crate directly. Cost factor comes from configuration (12 by
//! default, matching existing stored hashes).

use crate::config;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password")]
    Hash(#[source] bcrypt::BcryptError),
    #[error("failed to verify password")]
    Verify(#[source] bcrypt::BcryptError),
}

pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let cost = config::config().security.bcrypt_cost;
    bcrypt::hash(plain, cost).map_err(PasswordError::Hash)
}

/// Constant-time comparison of a candidate password against a stored hash.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(plain, hashed).map_err(PasswordError::Verify)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("password123").unwrap();
        assert_ne!(hash, "password123");
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("wrongpass", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("password123").unwrap();
        let b = hash_password("password123").unwrap();
        assert_ne!(a, b);
    }
}
