use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_SESSION_TTL_SECS, MIN_JWT_SECRET_BYTES,
    MIN_SESSION_TTL_SECS,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret for session credentials
    pub jwt_secret: Option<String>,
    pub session_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        match &self.jwt_secret {
            None => {
                return Err(ConfigError::auth(
                    "auth.jwt_secret is required (set TALLY_AUTH_JWT_SECRET or config.toml)",
                ));
            }
            Some(secret) if secret.len() < MIN_JWT_SECRET_BYTES => {
                return Err(ConfigError::auth(format!(
                    "auth.jwt_secret must be at least {} bytes, got {}",
                    MIN_JWT_SECRET_BYTES,
                    secret.len()
                )));
            }
            Some(_) => {}
        }

        if self.session_ttl_secs < MIN_SESSION_TTL_SECS {
            return Err(ConfigError::auth(format!(
                "auth.session_ttl_secs must be >= {}, got {}",
                MIN_SESSION_TTL_SECS, self.session_ttl_secs
            )));
        }

        Ok(())
    }
}
