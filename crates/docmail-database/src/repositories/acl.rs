//! ACL repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use docmail_core::error::{AppError, ErrorKind};
use docmail_core::result::AppResult;
use docmail_core::types::UserId;
use docmail_entity::permission::{AclEntry, CreateAclEntry, Permission};

use crate::store::AclStore;

/// Repository for ACL entries.
#[derive(Debug, Clone)]
pub struct AclRepository {
    pool: PgPool,
}

impl AclRepository {
    /// Create a new ACL repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AclStore for AclRepository {
    async fn has_grant(
        &self,
        user_id: UserId,
        resource_type: &str,
        resource_id: i64,
        permission: Permission,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM acl_entries \
                WHERE user_id = $1 AND resource_type = $2 AND permission = $4 \
                AND (resource_id IS NULL OR resource_id = $3) \
             )",
        )
        .bind(user_id)
        .bind(resource_type)
        .bind(resource_id)
        .bind(permission)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check ACL", e))
    }

    async fn grant(&self, data: &CreateAclEntry) -> AppResult<AclEntry> {
        sqlx::query_as::<_, AclEntry>(
            "INSERT INTO acl_entries (resource_type, resource_id, user_id, permission) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (resource_type, resource_id, user_id, permission) \
             DO UPDATE SET permission = EXCLUDED.permission \
             RETURNING *",
        )
        .bind(&data.resource_type)
        .bind(data.resource_id)
        .bind(data.user_id)
        .bind(data.permission)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create ACL entry", e))
    }
}
