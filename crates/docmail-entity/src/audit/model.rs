//! Audit event entity model.

use chrono::{DateTime, Utc};
use docmail_core::types::AuditEventId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Verb recorded after a mail job delivered its email.
pub const EMAIL_SENT: &str = "mailing.email_sent";

/// A typed reference to a row of another table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Resource type.
    pub object_type: String,
    /// Resource primary key.
    pub object_id: i64,
}

impl ObjectRef {
    /// Create a reference.
    pub fn new(object_type: impl Into<String>, object_id: i64) -> Self {
        Self {
            object_type: object_type.into(),
            object_id,
        }
    }
}

/// An immutable audit event recording a user action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEvent {
    /// Primary key.
    pub id: AuditEventId,
    /// The verb (e.g., `"mailing.email_sent"`).
    pub verb: String,
    /// Email address of the user who performed the action.
    pub actor: String,
    /// Type of the target resource.
    pub target_type: String,
    /// Target resource id.
    pub target_id: i64,
    /// Type of the object acted upon, if any.
    pub action_object_type: Option<String>,
    /// Id of the object acted upon, if any.
    pub action_object_id: Option<i64>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    /// The target as a reference.
    pub fn target(&self) -> ObjectRef {
        ObjectRef::new(self.target_type.clone(), self.target_id)
    }

    /// The action object as a reference, if present.
    pub fn action_object(&self) -> Option<ObjectRef> {
        match (&self.action_object_type, self.action_object_id) {
            (Some(t), Some(id)) => Some(ObjectRef::new(t.clone(), id)),
            _ => None,
        }
    }
}

/// Data required to record a new audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEvent {
    /// The verb.
    pub verb: String,
    /// Actor address.
    pub actor: String,
    /// Target.
    pub target: ObjectRef,
    /// Action object.
    pub action_object: Option<ObjectRef>,
}
