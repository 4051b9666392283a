//! Mailer profile entity model.

use chrono::{DateTime, Utc};
use docmail_core::types::UserMailerId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A configured mail transport profile users can be granted permission
/// to send through.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserMailer {
    /// Primary key.
    pub id: UserMailerId,
    /// Display label.
    pub label: String,
    /// Whether the profile may be used.
    pub enabled: bool,
    /// Whether this is the profile used when none is selected.
    pub is_default: bool,
    /// Backend name (`"smtp"`, `"memory"`).
    pub backend_path: String,
    /// Backend-specific settings (JSON object).
    pub backend_data: serde_json::Value,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl UserMailer {
    /// Read a string value from the backend settings.
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.backend_data.get(key).and_then(|v| v.as_str())
    }

    /// Sender address configured on the profile.
    pub fn from_address(&self) -> Option<&str> {
        self.setting_str("from")
    }
}
