//! User directory: registration, login, profile and skill-list edits, and
//! the skill-name queries.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use super::DomainError;
use super::auth::{LoginCredentials, RegistrationDetails};
use super::credential::PasswordHash;
use super::ports::{SkillNameFilter, UserRepository, UserStoreError};
use super::user::{LearningInterest, LearningPriority, ProfileUpdate, Skill, SkillLevel, User};

fn store_failure(err: &UserStoreError) -> DomainError {
    error!(error = %err, "user store operation failed");
    DomainError::internal("user store operation failed")
}

/// CRUD over user profiles, skill lists, and learning interests.
#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
}

impl UserDirectory {
    /// Build a directory over the given user store.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new user. The password is stored only after one-way
    /// hashing with a per-user random salt.
    pub async fn register(&self, details: &RegistrationDetails) -> Result<User, DomainError> {
        let password = PasswordHash::derive(details.password()).map_err(|err| {
            error!(error = %err, "password hashing failed");
            DomainError::internal("could not process registration")
        })?;
        let user = User::new(
            details.username().clone(),
            details.email().clone(),
            password,
            details.profile().clone(),
            Utc::now(),
        );
        match self.users.insert(user).await {
            Ok(user) => {
                info!(user = %user.username, "user registered");
                Ok(user)
            }
            Err(UserStoreError::DuplicateUsername | UserStoreError::DuplicateEmail) => {
                Err(DomainError::conflict("user already exists"))
            }
            Err(err) => Err(store_failure(&err)),
        }
    }

    /// Check credentials against the stored hash.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// response does not reveal which half failed.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(|err| store_failure(&err))?;
        match user {
            Some(user) if user.password.verify(credentials.password()) => Ok(user),
            _ => Err(DomainError::unauthorized("invalid credentials")),
        }
    }

    /// Fetch a user by id.
    pub async fn fetch(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(|err| store_failure(&err))?
            .ok_or_else(|| DomainError::not_found("user not found"))
    }

    /// Apply a validated, all-or-nothing profile update.
    pub async fn update_profile(
        &self,
        mut user: User,
        update: &ProfileUpdate,
    ) -> Result<User, DomainError> {
        update.apply(&mut user.profile);
        user.touch(Utc::now());
        self.users.save(user).await.map_err(|err| store_failure(&err))
    }

    /// Append a skill to the user's offered list.
    pub async fn add_skill(
        &self,
        mut user: User,
        name: String,
        level: SkillLevel,
    ) -> Result<User, DomainError> {
        user.skills.push(Skill::new(name, level));
        user.touch(Utc::now());
        self.users.save(user).await.map_err(|err| store_failure(&err))
    }

    /// Remove a skill by entry id. Removing an absent id is a no-op, not an
    /// error.
    pub async fn remove_skill(&self, mut user: User, skill_id: Uuid) -> Result<User, DomainError> {
        user.skills.retain(|skill| skill.id != skill_id);
        user.touch(Utc::now());
        self.users.save(user).await.map_err(|err| store_failure(&err))
    }

    /// Append a learning interest.
    pub async fn add_learning_interest(
        &self,
        mut user: User,
        name: String,
        priority: LearningPriority,
    ) -> Result<User, DomainError> {
        user.skills_to_learn.push(LearningInterest::new(name, priority));
        user.touch(Utc::now());
        self.users.save(user).await.map_err(|err| store_failure(&err))
    }

    /// Remove a learning interest by entry id. Absent ids are a no-op.
    pub async fn remove_learning_interest(
        &self,
        mut user: User,
        skill_id: Uuid,
    ) -> Result<User, DomainError> {
        user.skills_to_learn.retain(|interest| interest.id != skill_id);
        user.touch(Utc::now());
        self.users.save(user).await.map_err(|err| store_failure(&err))
    }

    /// Every skill name across all users, deduplicated.
    pub async fn all_skill_names(&self) -> Result<Vec<String>, DomainError> {
        self.users
            .skill_names(SkillNameFilter::All)
            .await
            .map_err(|err| store_failure(&err))
    }

    /// Skill names held at exactly this level, deduplicated.
    pub async fn skill_names_by_level(&self, level: SkillLevel) -> Result<Vec<String>, DomainError> {
        self.users
            .skill_names(SkillNameFilter::Level(level))
            .await
            .map_err(|err| store_failure(&err))
    }

    /// Skill names matching a case-insensitive substring, deduplicated.
    pub async fn search_skill_names(&self, needle: &str) -> Result<Vec<String>, DomainError> {
        self.users
            .skill_names(SkillNameFilter::Matching(needle.to_owned()))
            .await
            .map_err(|err| store_failure(&err))
    }

    /// Users offering at least one skill matching the substring.
    pub async fn search_users_by_skill(&self, needle: &str) -> Result<Vec<User>, DomainError> {
        self.users
            .search_by_skill(needle)
            .await
            .map_err(|err| store_failure(&err))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::auth::RegistrationDetails;
    use crate::outbound::memory::MemoryStore;
    use rstest::rstest;

    fn directory() -> UserDirectory {
        UserDirectory::new(Arc::new(MemoryStore::default()))
    }

    fn registration(username: &str, email: &str) -> RegistrationDetails {
        RegistrationDetails::try_from_parts(username, email, "secret123", None)
            .expect("valid registration")
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let directory = directory();
        directory
            .register(&registration("alice", "alice@example.com"))
            .await
            .expect("first registration succeeds");
        let err = directory
            .register(&registration("alice", "other@example.com"))
            .await
            .expect_err("duplicate username must fail");
        assert_eq!(err.code(), crate::domain::ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let directory = directory();
        directory
            .register(&registration("alice", "alice@example.com"))
            .await
            .expect("first registration succeeds");
        let err = directory
            .register(&registration("bob", "alice@example.com"))
            .await
            .expect_err("duplicate email must fail");
        assert_eq!(err.code(), crate::domain::ErrorCode::Conflict);
    }

    #[rstest]
    #[case("alice@example.com", "secret123", true)]
    #[case("alice@example.com", "wrong-password", false)]
    #[case("unknown@example.com", "secret123", false)]
    #[tokio::test]
    async fn login_matrix(#[case] email: &str, #[case] password: &str, #[case] succeeds: bool) {
        let directory = directory();
        directory
            .register(&registration("alice", "alice@example.com"))
            .await
            .expect("registration succeeds");

        let credentials =
            LoginCredentials::try_from_parts(email, password).expect("credential shape");
        let result = directory.login(&credentials).await;
        assert_eq!(result.is_ok(), succeeds);
        if let Err(err) = result {
            assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
        }
    }

    #[tokio::test]
    async fn skill_list_reflects_adds_minus_matched_removes() {
        let directory = directory();
        let user = directory
            .register(&registration("alice", "alice@example.com"))
            .await
            .expect("registration succeeds");

        let user = directory
            .add_skill(user, "Guitar".into(), SkillLevel::Intermediate)
            .await
            .expect("add succeeds");
        let user = directory
            .add_skill(user, "Singing".into(), SkillLevel::Beginner)
            .await
            .expect("add succeeds");
        let guitar_id = user.skills[0].id;

        // Removing an unknown id leaves the list untouched.
        let user = directory
            .remove_skill(user, Uuid::new_v4())
            .await
            .expect("no-op removal succeeds");
        assert_eq!(user.skills.len(), 2);

        let user = directory
            .remove_skill(user, guitar_id)
            .await
            .expect("removal succeeds");
        let names: Vec<&str> = user.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Singing"]);
    }

    #[tokio::test]
    async fn learning_interest_removal_is_symmetric() {
        let directory = directory();
        let user = directory
            .register(&registration("alice", "alice@example.com"))
            .await
            .expect("registration succeeds");

        let user = directory
            .add_learning_interest(user, "Piano".into(), LearningPriority::High)
            .await
            .expect("add succeeds");
        let id = user.skills_to_learn[0].id;
        let user = directory
            .remove_learning_interest(user, id)
            .await
            .expect("removal succeeds");
        assert!(user.skills_to_learn.is_empty());
    }

    #[tokio::test]
    async fn skill_name_queries_deduplicate() {
        let directory = directory();
        let alice = directory
            .register(&registration("alice", "alice@example.com"))
            .await
            .expect("registration succeeds");
        let bob = directory
            .register(&registration("bob", "bob@example.com"))
            .await
            .expect("registration succeeds");

        directory
            .add_skill(alice, "Guitar".into(), SkillLevel::Intermediate)
            .await
            .expect("add succeeds");
        let bob = directory
            .add_skill(bob, "Guitar".into(), SkillLevel::Expert)
            .await
            .expect("add succeeds");
        directory
            .add_skill(bob, "Piano".into(), SkillLevel::Beginner)
            .await
            .expect("add succeeds");

        assert_eq!(
            directory.all_skill_names().await.expect("query succeeds"),
            ["Guitar", "Piano"]
        );
        assert_eq!(
            directory
                .skill_names_by_level(SkillLevel::Expert)
                .await
                .expect("query succeeds"),
            ["Guitar"]
        );
        assert_eq!(
            directory
                .search_skill_names("gui")
                .await
                .expect("query succeeds"),
            ["Guitar"]
        );
        let matches = directory
            .search_users_by_skill("gui")
            .await
            .expect("query succeeds");
        let usernames: Vec<&str> = matches.iter().map(|u| u.username.as_ref()).collect();
        assert_eq!(usernames, ["alice", "bob"]);
    }
}
