//! One-way password hashing for the credential embedded in each user record.
//!
//! The hash is an argon2id PHC string with a per-user random salt. It is
//! deliberately opaque: nothing outside this module inspects the string, and
//! the public profile projection never carries it.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

/// Failure raised while deriving a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct CredentialError {
    message: String,
}

/// Hashed secret stored on a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    pub fn derive(password: &str) -> Result<Self, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialError {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Check a candidate password against the stored hash.
    ///
    /// An unparseable stored hash verifies as false rather than erroring; the
    /// caller cannot do anything more useful with a corrupt credential.
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(parsed) = PhcString::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}
