//! Mail transport errors.

use thiserror::Error;

use docmail_core::error::{AppError, ErrorKind};

/// Failure to build or deliver an email.
#[derive(Debug, Error)]
pub enum MailError {
    /// A backend setting is missing or malformed.
    #[error("missing required config: {0}")]
    MissingConfig(String),

    /// An address could not be parsed.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(String),

    /// The SMTP exchange failed.
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// No backend is registered under the profile's backend name.
    #[error("unknown mail backend: {0}")]
    UnknownBackend(String),
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        let message = err.to_string();
        AppError::with_source(ErrorKind::ExternalService, message, err)
    }
}
