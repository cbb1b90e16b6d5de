//! Shared fixtures for unit tests.

use chrono::Utc;

use crate::domain::credential::PasswordHash;
use crate::domain::user::{EmailAddress, Profile, User, Username};

/// A freshly registered user with the password `secret123`.
pub fn sample_user(username: &str, email: &str) -> User {
    User::new(
        Username::new(username).expect("valid username"),
        EmailAddress::new(email).expect("valid email"),
        PasswordHash::derive("secret123").expect("hash derivation"),
        Profile::default(),
        Utc::now(),
    )
}
