//! Port for user document persistence.
//!
//! The store is reachable by id and by filter predicate; the skill-name
//! queries push their predicates down so adapters can index or scan as they
//! see fit. Uniqueness of username and email is the adapter's contract.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::{EmailAddress, SkillLevel, User};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserStoreError {
    /// The username is already taken by another user.
    #[error("username already taken")]
    DuplicateUsername,
    /// The email address is already registered.
    #[error("email already registered")]
    DuplicateEmail,
    /// Query or mutation failed inside the adapter.
    #[error("user store operation failed: {message}")]
    Backend { message: String },
}

/// Predicate for the deduplicated skill-name queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillNameFilter {
    /// Every skill name across all users.
    All,
    /// Names of skills held at exactly this level.
    Level(SkillLevel),
    /// Case-insensitive substring match on the skill name.
    Matching(String),
}

/// CRUD plus filtered search over user documents.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, enforcing username and email uniqueness.
    async fn insert(&self, user: User) -> Result<User, UserStoreError>;

    /// Fetch a user by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by case-normalised email.
    async fn find_by_email(&self, email: &EmailAddress)
    -> Result<Option<User>, UserStoreError>;

    /// Replace the stored document for this user id.
    async fn save(&self, user: User) -> Result<User, UserStoreError>;

    /// Users holding at least one skill whose name contains `needle`,
    /// case-insensitively. Ordered by username for stable output.
    async fn search_by_skill(&self, needle: &str) -> Result<Vec<User>, UserStoreError>;

    /// Deduplicated, sorted skill names matching the filter.
    async fn skill_names(&self, filter: SkillNameFilter) -> Result<Vec<String>, UserStoreError>;
}
