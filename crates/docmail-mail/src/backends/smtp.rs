//! SMTP backend built on lettre.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;
use tracing::debug;

use docmail_entity::mailer::UserMailer;

use crate::error::MailError;
use crate::message::OutgoingEmail;
use crate::registry::MailBackend;
use crate::transport::MailTransport;

/// SMTP settings stored in a mailer profile's `backend_data`.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    /// SMTP server hostname.
    pub host: String,

    /// SMTP server port (default: 587).
    #[serde(default = "default_port")]
    pub port: u16,

    /// SMTP username for authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password for authentication.
    #[serde(default)]
    pub password: Option<String>,

    /// Default sender address.
    pub from: String,

    /// TLS mode: "starttls" (default), "tls", or "none".
    #[serde(default = "default_tls")]
    pub tls: String,

    /// Connection timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_port() -> u16 {
    587
}

fn default_tls() -> String {
    "starttls".to_string()
}

fn default_timeout() -> u64 {
    10
}

/// SMTP transport configured from one mailer profile.
#[derive(Clone)]
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpTransport {
    /// Create a transport from explicit settings.
    pub fn from_settings(settings: SmtpSettings) -> Result<Self, MailError> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|_| MailError::InvalidAddress(settings.from.clone()))?;

        let mut builder = match settings.tls.as_str() {
            "none" => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
            "tls" => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            _ => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
        };

        builder = builder
            .port(settings.port)
            .timeout(Some(Duration::from_secs(settings.timeout)));

        if let (Some(username), Some(password)) = (settings.username, settings.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Build a lettre message from an outgoing email.
    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        let from_mailbox = match &email.from {
            Some(f) => f.parse().map_err(|_| MailError::InvalidAddress(f.clone()))?,
            None => self.from.clone(),
        };

        let mut builder = Message::builder().from(from_mailbox);
        for to in &email.to {
            let mailbox: Mailbox = to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.clone()))?;
            builder = builder.to(mailbox);
        }
        builder = builder.subject(&email.subject);

        if email.attachments.is_empty() {
            return builder
                .body(email.body.clone())
                .map_err(|e| MailError::Build(e.to_string()));
        }

        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(email.body.clone()));
        for attachment in &email.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| MailError::Build(e.to_string()))?;
            parts = parts.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.data.to_vec(), content_type),
            );
        }

        builder
            .multipart(parts)
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        debug!(to = ?email.to, "SMTP message accepted");
        Ok(())
    }
}

/// Backend named `smtp`; settings come from the profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpBackend;

impl MailBackend for SmtpBackend {
    fn name(&self) -> &'static str {
        "smtp"
    }

    fn transport(&self, mailer: &UserMailer) -> Result<Arc<dyn MailTransport>, MailError> {
        let settings: SmtpSettings = serde_json::from_value(mailer.backend_data.clone())
            .map_err(|e| MailError::MissingConfig(format!("mailer {}: {e}", mailer.id)))?;
        Ok(Arc::new(SmtpTransport::from_settings(settings)?))
    }
}
