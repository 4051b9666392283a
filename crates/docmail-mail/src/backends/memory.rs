//! In-process outbox backend.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use docmail_entity::mailer::UserMailer;

use crate::error::MailError;
use crate::message::OutgoingEmail;
use crate::registry::MailBackend;
use crate::transport::MailTransport;

/// Collects every email sent through it.
#[derive(Debug, Default)]
pub struct MemoryOutbox {
    sent: RwLock<Vec<OutgoingEmail>>,
}

impl MemoryOutbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every email sent so far.
    pub async fn messages(&self) -> Vec<OutgoingEmail> {
        self.sent.read().await.clone()
    }

    /// Number of emails sent so far.
    pub async fn len(&self) -> usize {
        self.sent.read().await.len()
    }

    /// Whether nothing has been sent.
    pub async fn is_empty(&self) -> bool {
        self.sent.read().await.is_empty()
    }
}

#[async_trait]
impl MailTransport for MemoryOutbox {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.sent.write().await.push(email.clone());
        Ok(())
    }
}

/// Backend named `memory`; every profile shares one outbox.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    outbox: Arc<MemoryOutbox>,
}

impl MemoryBackend {
    /// Create a backend delivering into `outbox`.
    pub fn new(outbox: Arc<MemoryOutbox>) -> Self {
        Self { outbox }
    }
}

impl MailBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn transport(&self, _mailer: &UserMailer) -> Result<Arc<dyn MailTransport>, MailError> {
        Ok(self.outbox.clone())
    }
}
