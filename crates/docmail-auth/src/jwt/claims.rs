//! JWT claims structure carried by access tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docmail_core::types::UserId;

/// JWT claims payload embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's primary key in the host application.
    pub sub: UserId,
    /// The user's email address, used as the sender of outgoing mail.
    pub email: String,
    /// Username for logging.
    #[serde(default)]
    pub username: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> UserId {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
