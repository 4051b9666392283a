//! The mail form submitted by users.

use serde::{Deserialize, Serialize};
use validator::Validate;

use docmail_core::types::UserMailerId;

/// Fields of a send request. Subject and body fall back to configured
/// templates when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MailForm {
    /// Recipient address.
    #[serde(alias = "email")]
    #[validate(email(message = "Enter a valid email address"))]
    pub recipient: String,

    /// Subject template.
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Subject must be 1 to 255 characters"))]
    pub subject: Option<String>,

    /// Body template.
    #[serde(default)]
    #[validate(length(min = 1, message = "Body must not be empty"))]
    pub body: Option<String>,

    /// Mailer profile; the default profile is used when omitted.
    #[serde(default)]
    pub user_mailer_id: Option<UserMailerId>,
}

/// Flatten validator errors into one line.
pub(crate) fn describe(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
