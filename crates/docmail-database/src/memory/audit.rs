//! In-memory audit event log.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use docmail_core::result::AppResult;
use docmail_core::types::AuditEventId;
use docmail_entity::audit::{AuditEvent, CreateAuditEvent, ObjectRef};

use crate::store::AuditStore;

/// Audit events held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemoryAuditStore {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded event.
    pub async fn all(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn record(&self, data: &CreateAuditEvent) -> AppResult<AuditEvent> {
        let mut events = self.events.write().await;
        let event = AuditEvent {
            id: AuditEventId(events.len() as i64 + 1),
            verb: data.verb.clone(),
            actor: data.actor.clone(),
            target_type: data.target.object_type.clone(),
            target_id: data.target.object_id,
            action_object_type: data.action_object.as_ref().map(|o| o.object_type.clone()),
            action_object_id: data.action_object.as_ref().map(|o| o.object_id),
            created_at: Utc::now(),
        };
        events.push(event.clone());
        Ok(event)
    }

    async fn find_by_target(&self, target: &ObjectRef) -> AppResult<Vec<AuditEvent>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.target() == *target)
            .cloned()
            .collect())
    }
}
