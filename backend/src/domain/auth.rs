//! Authentication payload validation.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service. Raw
//! passwords are held in zeroizing buffers so they are wiped on drop.

use zeroize::Zeroizing;

use super::user::{EmailAddress, PASSWORD_MIN, Profile, UserValidationError, Username};

/// Validation failures for registration and login payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    #[error(transparent)]
    Field(#[from] UserValidationError),
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated registration payload.
///
/// ## Invariants
/// - `username` satisfies [`Username`] rules (trimmed, minimum length).
/// - `email` is case-normalised and well formed.
/// - `password` meets the minimum length and is never logged.
#[derive(Debug, Clone)]
pub struct RegistrationDetails {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
    profile: Profile,
}

impl RegistrationDetails {
    /// Construct registration details from raw request fields.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        profile: Option<Profile>,
    ) -> Result<Self, AuthValidationError> {
        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::Field(
                UserValidationError::PasswordTooShort,
            ));
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
            profile: profile.unwrap_or_default(),
        })
    }

    /// Validated username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Case-normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Raw password, pending hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Initial profile fields supplied at registration.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}

/// Validated login credentials.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    ///
    /// The password is only required to be non-empty here: length rules
    /// apply at registration, not when checking an existing credential.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used for the user lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Candidate password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("al", "a@example.com", "secret123")]
    #[case("alice", "not-an-email", "secret123")]
    #[case("alice", "a@example.com", "short")]
    fn invalid_registrations_rejected(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        assert!(RegistrationDetails::try_from_parts(username, email, password, None).is_err());
    }

    #[test]
    fn registration_normalises_fields() {
        let details =
            RegistrationDetails::try_from_parts(" alice ", "Alice@Example.com", "secret123", None)
                .expect("valid registration");
        assert_eq!(details.username().as_ref(), "alice");
        assert_eq!(details.email().as_ref(), "alice@example.com");
        assert_eq!(details.profile(), &Profile::default());
    }

    #[rstest]
    #[case("bad-email", "pw")]
    #[case("a@example.com", "")]
    fn invalid_credentials_rejected(#[case] email: &str, #[case] password: &str) {
        assert!(LoginCredentials::try_from_parts(email, password).is_err());
    }

    #[test]
    fn login_lookup_email_is_normalised() {
        let creds = LoginCredentials::try_from_parts("Alice@Example.com", "pw")
            .expect("valid credentials");
        assert_eq!(creds.email().as_ref(), "alice@example.com");
    }
}
