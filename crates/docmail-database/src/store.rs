//! Narrow store traits the mailing flow depends on.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory one in [`crate::memory`].

use async_trait::async_trait;

use docmail_core::result::AppResult;
use docmail_core::types::{
    DocumentFileId, DocumentId, DocumentVersionId, UserId, UserMailerId,
};
use docmail_entity::audit::{AuditEvent, CreateAuditEvent, ObjectRef};
use docmail_entity::document::{Document, DocumentFile, DocumentVersion};
use docmail_entity::mailer::UserMailer;
use docmail_entity::permission::{AclEntry, CreateAclEntry, Permission};

/// Read access to documents, files and versions.
#[async_trait]
pub trait EntityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a document by id, trashed or not.
    async fn find_document(&self, id: DocumentId) -> AppResult<Option<Document>>;

    /// Find a document file by id.
    async fn find_document_file(&self, id: DocumentFileId) -> AppResult<Option<DocumentFile>>;

    /// Find a document version by id.
    async fn find_document_version(
        &self,
        id: DocumentVersionId,
    ) -> AppResult<Option<DocumentVersion>>;
}

/// Read access to mailer profiles.
#[async_trait]
pub trait MailerStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a mailer profile by id.
    async fn find_by_id(&self, id: UserMailerId) -> AppResult<Option<UserMailer>>;

    /// The enabled profile flagged as default, if any.
    async fn find_default(&self) -> AppResult<Option<UserMailer>>;
}

/// Access control entries.
#[async_trait]
pub trait AclStore: Send + Sync + std::fmt::Debug + 'static {
    /// Whether `user_id` holds `permission` on the resource, either directly
    /// or through a type-wide grant.
    async fn has_grant(
        &self,
        user_id: UserId,
        resource_type: &str,
        resource_id: i64,
        permission: Permission,
    ) -> AppResult<bool>;

    /// Create a grant.
    async fn grant(&self, data: &CreateAclEntry) -> AppResult<AclEntry>;
}

/// Append-only audit event log.
#[async_trait]
pub trait AuditStore: Send + Sync + std::fmt::Debug + 'static {
    /// Record an event.
    async fn record(&self, data: &CreateAuditEvent) -> AppResult<AuditEvent>;

    /// Events whose target is `target`, oldest first.
    async fn find_by_target(&self, target: &ObjectRef) -> AppResult<Vec<AuditEvent>>;
}
