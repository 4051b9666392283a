//! Mail composition configuration.

use serde::{Deserialize, Serialize};

/// Settings used when composing outgoing document emails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Fixed base URL of the installation. When unset the URL is derived
    /// from the incoming request.
    #[serde(default)]
    pub installation_url: Option<String>,
    /// Subject pre-filled when the form leaves it empty.
    #[serde(default = "default_subject")]
    pub default_subject: String,
    /// Body template for attachment sends.
    #[serde(default = "default_attachment_body")]
    pub attachment_body: String,
    /// Body template for link sends.
    #[serde(default = "default_link_body")]
    pub link_body: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            installation_url: None,
            default_subject: default_subject(),
            attachment_body: default_attachment_body(),
            link_body: default_link_body(),
        }
    }
}

fn default_subject() -> String {
    "{{ document }}".to_string()
}

fn default_attachment_body() -> String {
    "Attached to this email is the document: {{ document }}\n\n --------\n This email has been sent from DocMail.".to_string()
}

fn default_link_body() -> String {
    "To access this document click on the following link: {{ link }}\n\n --------\n This email has been sent from DocMail.".to_string()
}
