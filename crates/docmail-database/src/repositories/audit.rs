//! Audit event repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use docmail_core::error::{AppError, ErrorKind};
use docmail_core::result::AppResult;
use docmail_entity::audit::{AuditEvent, CreateAuditEvent, ObjectRef};

use crate::store::AuditStore;

/// Repository for audit events.
#[derive(Debug, Clone)]
pub struct AuditEventRepository {
    pool: PgPool,
}

impl AuditEventRepository {
    /// Create a new audit event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditEventRepository {
    async fn record(&self, data: &CreateAuditEvent) -> AppResult<AuditEvent> {
        sqlx::query_as::<_, AuditEvent>(
            "INSERT INTO audit_events \
             (verb, actor, target_type, target_id, action_object_type, action_object_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.verb)
        .bind(&data.actor)
        .bind(&data.target.object_type)
        .bind(data.target.object_id)
        .bind(data.action_object.as_ref().map(|o| o.object_type.as_str()))
        .bind(data.action_object.as_ref().map(|o| o.object_id))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record audit event", e))
    }

    async fn find_by_target(&self, target: &ObjectRef) -> AppResult<Vec<AuditEvent>> {
        sqlx::query_as::<_, AuditEvent>(
            "SELECT * FROM audit_events WHERE target_type = $1 AND target_id = $2 \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(&target.object_type)
        .bind(target.object_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list audit events", e))
    }
}
