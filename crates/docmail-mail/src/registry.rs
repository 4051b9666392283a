//! Backend registry keyed by a mailer profile's `backend_path`.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use docmail_entity::mailer::UserMailer;

use crate::error::MailError;
use crate::transport::MailTransport;

/// A named kind of transport that can be configured from a mailer profile.
pub trait MailBackend: Send + Sync + 'static {
    /// Name matched against `UserMailer::backend_path`.
    fn name(&self) -> &'static str;

    /// Build a transport from the profile's backend settings.
    fn transport(&self, mailer: &UserMailer) -> Result<Arc<dyn MailTransport>, MailError>;
}

/// Registry of mail backends, built once at startup.
#[derive(Default, Clone)]
pub struct MailBackendRegistry {
    backends: HashMap<&'static str, Arc<dyn MailBackend>>,
}

impl std::fmt::Debug for MailBackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailBackendRegistry")
            .field("backends", &self.backends.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MailBackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend.
    pub fn register(&mut self, backend: Arc<dyn MailBackend>) {
        let name = backend.name();
        debug!(backend = name, "Registered mail backend");
        self.backends.insert(name, backend);
    }

    /// Registered backend names.
    pub fn names(&self) -> Vec<&'static str> {
        self.backends.keys().copied().collect()
    }

    /// Build the transport configured by `mailer`.
    pub fn transport_for(&self, mailer: &UserMailer) -> Result<Arc<dyn MailTransport>, MailError> {
        let backend = self
            .backends
            .get(mailer.backend_path.as_str())
            .ok_or_else(|| MailError::UnknownBackend(mailer.backend_path.clone()))?;
        backend.transport(mailer)
    }
}
