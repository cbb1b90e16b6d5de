//! Port for the session token signer/verifier.
//!
//! The token primitive is a black box to the domain: something that turns a
//! user id into an opaque bearer string and back, enforcing expiry. The
//! shipped adapter signs JWTs; tests can substitute a stub.

use uuid::Uuid;

/// Errors raised by token codec adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature, format, or expiry check failed.
    #[error("token rejected: {message}")]
    Rejected { message: String },
    /// The token could not be produced.
    #[error("token issuance failed: {message}")]
    Issuance { message: String },
}

/// Issues and verifies opaque bearer tokens carrying a user id.
pub trait TokenCodec: Send + Sync {
    /// Sign a fresh token embedding `user` with the configured validity.
    fn issue(&self, user: Uuid) -> Result<String, TokenError>;

    /// Verify signature and expiry, returning the embedded user id.
    fn verify(&self, token: &str) -> Result<Uuid, TokenError>;
}
