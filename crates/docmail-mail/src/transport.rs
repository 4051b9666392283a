//! The mail transport seam.

use async_trait::async_trait;

use crate::error::MailError;
use crate::message::OutgoingEmail;

/// Async email sending trait.
///
/// Implement this trait to provide alternative email backends.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Send an email.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}
