//! JWT token creation.
//!
//! Production tokens come from the host application; the encoder exists so
//! operators and tests can mint compatible tokens.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use docmail_core::config::AuthConfig;
use docmail_core::error::AppError;
use docmail_core::types::UserId;

use super::claims::Claims;

/// Creates signed JWT access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    access_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_minutes: config.jwt_access_ttl_minutes as i64,
        }
    }

    /// Issue an access token for `user_id`, whose address is `email`.
    pub fn issue(
        &self,
        user_id: UserId,
        email: &str,
        username: Option<&str>,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            username: username.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::minutes(self.access_ttl_minutes)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }
}
