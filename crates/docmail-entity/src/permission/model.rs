//! ACL entry entity model.

use chrono::{DateTime, Utc};
use docmail_core::types::{AclEntryId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::permission::Permission;

/// A grant of one permission to one user.
///
/// `resource_id = None` grants the permission on every resource of
/// `resource_type`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AclEntry {
    /// Primary key.
    pub id: AclEntryId,
    /// Resource type (`"document"`, `"document_file"`, `"document_version"`,
    /// `"user_mailer"`).
    pub resource_type: String,
    /// Resource primary key, or `None` for a type-wide grant.
    pub resource_id: Option<i64>,
    /// Grantee.
    pub user_id: UserId,
    /// Granted permission.
    pub permission: Permission,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
}

impl AclEntry {
    /// Whether this entry grants `permission` to `user_id` on the resource.
    pub fn grants(
        &self,
        user_id: UserId,
        resource_type: &str,
        resource_id: i64,
        permission: Permission,
    ) -> bool {
        self.user_id == user_id
            && self.permission == permission
            && self.resource_type == resource_type
            && self.resource_id.is_none_or(|id| id == resource_id)
    }
}

/// Data required to create a new ACL entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAclEntry {
    /// Resource type.
    pub resource_type: String,
    /// Resource primary key.
    pub resource_id: Option<i64>,
    /// Grantee.
    pub user_id: UserId,
    /// Granted permission.
    pub permission: Permission,
}
