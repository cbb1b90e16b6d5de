//! Environment-driven application configuration.
//!
//! Everything the process reads from its environment is resolved here, once,
//! into an explicit value passed down to the server builder. Nothing else in
//! the crate touches environment variables.

use std::net::SocketAddr;

use chrono::Duration;
use tracing::warn;

/// Fallback signing secret for development setups.
///
/// Known weakness carried over from the service this replaces: the process
/// starts without `JWT_SECRET` and logs a warning rather than refusing.
const DEV_JWT_SECRET: &str = "your-secret-key";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Error raised when the environment holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("BIND_ADDR is not a valid socket address: {value}")]
    InvalidBindAddr { value: String },
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_validity: Duration,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// `BIND_ADDR` defaults to `0.0.0.0:8080`; `JWT_SECRET` falls back to the
    /// development default with a logged warning.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(
            std::env::var("BIND_ADDR").ok(),
            std::env::var("JWT_SECRET").ok(),
        )
    }

    fn resolve(
        bind_addr: Option<String>,
        jwt_secret: Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw_addr = bind_addr.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr { value: raw_addr })?;

        let jwt_secret = jwt_secret.unwrap_or_else(|| {
            warn!("JWT_SECRET not set; using the development default secret");
            DEV_JWT_SECRET.to_owned()
        });

        Ok(Self {
            bind_addr,
            jwt_secret,
            token_validity: Duration::days(7),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn absent_variables_fall_back_to_defaults() {
        let config = AppConfig::resolve(None, None).expect("defaults apply");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.token_validity, Duration::days(7));
    }

    #[test]
    fn explicit_values_win() {
        let config = AppConfig::resolve(
            Some("127.0.0.1:9000".into()),
            Some("real-secret".into()),
        )
        .expect("valid config");
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.jwt_secret, "real-secret");
    }

    #[test]
    fn malformed_bind_addr_is_rejected() {
        let err = AppConfig::resolve(Some("not-an-address".into()), None)
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    }
}
