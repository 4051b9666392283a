//! Job implementations.

pub mod send_mail;

use std::sync::Arc;

pub use send_mail::{MailTaskDeps, SendMailTask};

use docmail_core::types::TargetKind;

use crate::executor::TaskRegistry;

/// Build the registry with one mail task per target kind.
pub fn mail_task_registry(deps: MailTaskDeps) -> TaskRegistry {
    let mut registry = TaskRegistry::new();
    for kind in TargetKind::ALL {
        registry.register(Arc::new(SendMailTask::new(kind, deps.clone())));
    }
    registry
}
