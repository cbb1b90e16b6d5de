//! JWT adapter for the token codec port.
//!
//! Tokens are HS256-signed and carry the user id in the `sub` claim with
//! issued-at and expiry timestamps. Expiry is validated on decode.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenCodec, TokenError};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// Signs and verifies HS256 session tokens.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl JwtTokenCodec {
    /// Build a codec around a shared secret and a token lifetime.
    pub fn new(secret: &str, validity: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validity,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, user: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user,
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|err| {
            TokenError::Issuance {
                message: err.to_string(),
            }
        })
    }

    fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|err| TokenError::Rejected {
                message: err.to_string(),
            })
    }
}
