//! User entity, validated field newtypes, and the public projection.
//!
//! The wire shape is camelCase throughout. The full [`User`] record is never
//! serialised directly: responses always go through [`PublicProfile`], which
//! omits the hashed credential by construction.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use super::DomainError;
use super::credential::PasswordHash;

/// Minimum length of a username after trimming.
pub const USERNAME_MIN: usize = 3;
/// Minimum length of a registration password.
pub const PASSWORD_MIN: usize = 6;

/// Validation errors for user field newtypes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("username must be at least {USERNAME_MIN} characters")]
    UsernameTooShort,
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least {PASSWORD_MIN} characters")]
    PasswordTooShort,
}

/// Unique handle chosen at registration. Trimmed, at least three characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username from raw input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.chars().count() < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Case-normalised email address. Stored lowercase so lookups and the
/// uniqueness check are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate, trim, and lowercase a raw email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Proficiency attached to an offered skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Parse the wire spelling (`Beginner`, `Intermediate`, ...).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Beginner" => Some(Self::Beginner),
            "Intermediate" => Some(Self::Intermediate),
            "Advanced" => Some(Self::Advanced),
            "Expert" => Some(Self::Expert),
            _ => None,
        }
    }
}

/// Urgency attached to a learning interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LearningPriority {
    Low,
    Medium,
    High,
}

impl LearningPriority {
    /// Parse the wire spelling (`Low`, `Medium`, `High`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }
}

/// A skill a user offers to teach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub level: SkillLevel,
    pub verified: bool,
}

impl Skill {
    /// Build a fresh, unverified skill entry.
    pub fn new(name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            level,
            verified: false,
        }
    }
}

/// A skill a user wants to acquire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningInterest {
    pub id: Uuid,
    pub name: String,
    pub priority: LearningPriority,
}

impl LearningInterest {
    /// Build a fresh learning interest entry.
    pub fn new(name: impl Into<String>, priority: LearningPriority) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            priority,
        }
    }
}

/// Badge earned on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub kind: String,
    pub name: String,
    pub date: DateTime<Utc>,
}

/// Running aggregate of ratings a user has received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub average: f64,
    pub count: u32,
}

impl Default for Rating {
    fn default() -> Self {
        Self {
            average: 0.0,
            count: 0,
        }
    }
}

impl Rating {
    /// Aggregate a list of received scores. Empty input yields the zero
    /// rating, keeping the `count > 0 => average = sum/count` invariant.
    pub fn from_scores(scores: &[u8]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let sum: u32 = scores.iter().map(|score| u32::from(*score)).sum();
        Self {
            average: f64::from(sum) / scores.len() as f64,
            count: scores.len() as u32,
        }
    }
}

/// Free-form profile fields. All optional; absent fields are omitted on the
/// wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Dotted-key fields accepted by the profile update endpoint. The avatar is
/// deliberately absent: it is not client-editable through this endpoint.
const PROFILE_UPDATE_ALLOW_LIST: [&str; 4] = [
    "profile.firstName",
    "profile.lastName",
    "profile.bio",
    "profile.location",
];

/// Validated, all-or-nothing profile update.
///
/// Built from the raw request map; a single disallowed key or non-string
/// value rejects the whole update without applying anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    first_name: Option<Option<String>>,
    last_name: Option<Option<String>>,
    bio: Option<Option<String>>,
    location: Option<Option<String>>,
}

impl ProfileUpdate {
    /// Validate a request body of dotted keys against the allow-list.
    ///
    /// String values set the field, explicit nulls clear it, and anything
    /// else (or any key outside the allow-list) fails the whole call.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, DomainError> {
        let mut update = Self::default();
        for (key, value) in fields {
            if !PROFILE_UPDATE_ALLOW_LIST.contains(&key.as_str()) {
                return Err(DomainError::invalid_request("invalid updates")
                    .with_details(serde_json::json!({ "field": key })));
            }
            let parsed = match value {
                Value::String(text) => Some(text.clone()),
                Value::Null => None,
                _ => {
                    return Err(DomainError::invalid_request("profile fields must be strings")
                        .with_details(serde_json::json!({ "field": key })));
                }
            };
            match key.as_str() {
                "profile.firstName" => update.first_name = Some(parsed),
                "profile.lastName" => update.last_name = Some(parsed),
                "profile.bio" => update.bio = Some(parsed),
                _ => update.location = Some(parsed),
            }
        }
        Ok(update)
    }

    /// Apply the update to a profile in place.
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(first_name) = &self.first_name {
            profile.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            profile.last_name = last_name.clone();
        }
        if let Some(bio) = &self.bio {
            profile.bio = bio.clone();
        }
        if let Some(location) = &self.location {
            profile.location = location.clone();
        }
    }
}

/// Full user record as held by the store. Not serialisable: responses go
/// through [`User::public_profile`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: Username,
    pub email: EmailAddress,
    pub password: PasswordHash,
    pub profile: Profile,
    pub skills: Vec<Skill>,
    pub skills_to_learn: Vec<LearningInterest>,
    pub achievements: Vec<Achievement>,
    pub rating: Rating,
    pub completed_exchanges: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh user at registration time.
    pub fn new(
        username: Username,
        email: EmailAddress,
        password: PasswordHash,
        profile: Profile,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password,
            profile,
            skills: Vec::new(),
            skills_to_learn: Vec::new(),
            achievements: Vec::new(),
            rating: Rating::default(),
            completed_exchanges: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the update timestamp after a mutation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Canonical response projection: the record minus the hashed secret.
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            username: self.username.to_string(),
            email: self.email.to_string(),
            profile: self.profile.clone(),
            skills: self.skills.clone(),
            skills_to_learn: self.skills_to_learn.clone(),
            achievements: self.achievements.clone(),
            rating: self.rating,
            completed_exchanges: self.completed_exchanges,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Display-safe summary embedded in exchange listings.
    pub fn participant_summary(&self) -> ParticipantSummary {
        ParticipantSummary {
            id: self.id,
            username: self.username.to_string(),
            first_name: self.profile.first_name.clone(),
            last_name: self.profile.last_name.clone(),
        }
    }
}

/// User record with the hashed secret stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile: Profile,
    pub skills: Vec<Skill>,
    pub skills_to_learn: Vec<LearningInterest>,
    pub achievements: Vec<Achievement>,
    pub rating: Rating,
    pub completed_exchanges: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Username and name fields only, for embedding other users in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}
