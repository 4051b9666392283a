//! # docmail-mail
//!
//! Outgoing email for DocMail: the [`MailTransport`] seam, the SMTP and
//! in-memory backends selected by a mailer profile's `backend_path`, and
//! the composer turning a resolved entity into an [`OutgoingEmail`].

pub mod backends;
pub mod composer;
pub mod error;
pub mod message;
pub mod registry;
pub mod transport;

pub use backends::memory::{MemoryBackend, MemoryOutbox};
pub use backends::smtp::{SmtpBackend, SmtpSettings, SmtpTransport};
pub use composer::{ComposeRequest, MailComposer};
pub use error::MailError;
pub use message::{EmailAttachment, OutgoingEmail};
pub use registry::{MailBackend, MailBackendRegistry};
pub use transport::MailTransport;
