//! Session guard: resolves a bearer token to the acting user.
//!
//! The guard only establishes identity. Ownership and participant checks
//! stay with the operation that needs them.

use std::sync::Arc;

use tracing::debug;

use super::DomainError;
use super::ports::{TokenCodec, TokenError, UserRepository, UserStoreError};
use super::user::User;

/// Why a bearer credential failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Signature or format invalid, or the token has expired.
    #[error("invalid or expired token")]
    InvalidToken,
    /// The embedded user id no longer resolves to a record.
    #[error("token user no longer exists")]
    UserNotFound,
    /// The user lookup itself failed.
    #[error("{0}")]
    Store(#[from] UserStoreError),
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::UserNotFound => {
                Self::unauthorized(err.to_string())
            }
            AuthError::Store(inner) => Self::internal(inner.to_string()),
        }
    }
}

/// Validates bearer credentials and resolves them to users.
#[derive(Clone)]
pub struct SessionGuard {
    tokens: Arc<dyn TokenCodec>,
    users: Arc<dyn UserRepository>,
}

impl SessionGuard {
    /// Build a guard over the given token codec and user store.
    pub fn new(tokens: Arc<dyn TokenCodec>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// Verify the token and load the acting user.
    pub async fn authenticate(&self, bearer: &str) -> Result<User, AuthError> {
        let user_id = self.tokens.verify(bearer).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            match err {
                TokenError::Rejected { .. } | TokenError::Issuance { .. } => {
                    AuthError::InvalidToken
                }
            }
        })?;
        match self.users.find_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => Err(AuthError::UserNotFound),
        }
    }
}
