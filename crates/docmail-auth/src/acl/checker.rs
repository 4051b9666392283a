//! ACL-backed access gate.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use docmail_core::result::AppResult;
use docmail_core::types::UserId;
use docmail_database::store::AclStore;
use docmail_entity::permission::Permission;

use super::gate::{AccessGate, AccessTarget};

/// Checks permissions against stored ACL entries, walking from a file or
/// version up to its document.
#[derive(Debug, Clone)]
pub struct AclChecker {
    store: Arc<dyn AclStore>,
}

impl AclChecker {
    /// Creates a new ACL checker.
    pub fn new(store: Arc<dyn AclStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccessGate for AclChecker {
    async fn has_access(
        &self,
        user_id: UserId,
        target: &AccessTarget,
        permission: Permission,
    ) -> AppResult<bool> {
        let mut current = Some(*target);
        while let Some(t) = current {
            if self
                .store
                .has_grant(user_id, t.resource_type(), t.resource_id(), permission)
                .await?
            {
                return Ok(true);
            }
            current = t.parent();
        }

        debug!(
            user_id = %user_id,
            resource_type = target.resource_type(),
            resource_id = target.resource_id(),
            permission = %permission,
            "Access denied"
        );
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmail_core::error::ErrorKind;
    use docmail_core::types::{DocumentFileId, DocumentId, UserMailerId};
    use docmail_database::memory::MemoryAclStore;
    use docmail_entity::permission::CreateAclEntry;

    async fn grant(store: &MemoryAclStore, resource_type: &str, id: i64, user: i64, p: Permission) {
        store
            .grant(&CreateAclEntry {
                resource_type: resource_type.into(),
                resource_id: Some(id),
                user_id: UserId(user),
                permission: p,
            })
            .await
            .expect("grant");
    }

    #[tokio::test]
    async fn test_file_inherits_document_grant() {
        let store = Arc::new(MemoryAclStore::new());
        grant(&store, "document", 1, 5, Permission::SendDocumentFileAttachment).await;
        let gate = AclChecker::new(store);

        let file = AccessTarget::DocumentFile {
            id: DocumentFileId(10),
            document_id: DocumentId(1),
        };
        assert!(gate
            .has_access(UserId(5), &file, Permission::SendDocumentFileAttachment)
            .await
            .expect("check"));
        assert!(!gate
            .has_access(UserId(5), &file, Permission::SendDocumentFileLink)
            .await
            .expect("check"));
    }

    #[tokio::test]
    async fn test_grant_on_other_document_does_not_apply() {
        let store = Arc::new(MemoryAclStore::new());
        grant(&store, "document", 2, 5, Permission::SendDocumentFileLink).await;
        let gate = AclChecker::new(store);

        let file = AccessTarget::DocumentFile {
            id: DocumentFileId(10),
            document_id: DocumentId(1),
        };
        assert!(!gate
            .has_access(UserId(5), &file, Permission::SendDocumentFileLink)
            .await
            .expect("check"));
    }

    #[tokio::test]
    async fn test_check_access_denial_is_authorization_error() {
        let gate = AclChecker::new(Arc::new(MemoryAclStore::new()));
        let err = gate
            .check_access(
                UserId(1),
                &AccessTarget::UserMailer(UserMailerId(3)),
                Permission::UserMailerUse,
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
    }

    #[tokio::test]
    async fn test_mailer_grant_allows_use() {
        let store = Arc::new(MemoryAclStore::new());
        grant(&store, "user_mailer", 3, 1, Permission::UserMailerUse).await;
        let gate = AclChecker::new(store);
        gate.check_access(
            UserId(1),
            &AccessTarget::UserMailer(UserMailerId(3)),
            Permission::UserMailerUse,
        )
        .await
        .expect("allowed");
    }
}
