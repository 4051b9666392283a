//! Authorization gate shared by every mailing entry point.

use async_trait::async_trait;

use docmail_core::error::AppError;
use docmail_core::result::AppResult;
use docmail_core::types::{
    DocumentFileId, DocumentId, DocumentVersionId, UserId, UserMailerId,
};
use docmail_entity::document::TargetEntity;
use docmail_entity::permission::Permission;

/// Something a permission can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTarget {
    /// A document.
    Document(DocumentId),
    /// A document file, which inherits grants from its document.
    DocumentFile {
        /// File id.
        id: DocumentFileId,
        /// Owning document.
        document_id: DocumentId,
    },
    /// A document version, which inherits grants from its document.
    DocumentVersion {
        /// Version id.
        id: DocumentVersionId,
        /// Owning document.
        document_id: DocumentId,
    },
    /// A mailer profile.
    UserMailer(UserMailerId),
}

impl AccessTarget {
    /// ACL resource type of this target.
    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::Document(_) => "document",
            Self::DocumentFile { .. } => "document_file",
            Self::DocumentVersion { .. } => "document_version",
            Self::UserMailer(_) => "user_mailer",
        }
    }

    /// ACL resource id of this target.
    pub fn resource_id(&self) -> i64 {
        match self {
            Self::Document(id) => id.get(),
            Self::DocumentFile { id, .. } => id.get(),
            Self::DocumentVersion { id, .. } => id.get(),
            Self::UserMailer(id) => id.get(),
        }
    }

    /// Target whose grants this target inherits.
    pub fn parent(&self) -> Option<AccessTarget> {
        match self {
            Self::DocumentFile { document_id, .. } | Self::DocumentVersion { document_id, .. } => {
                Some(Self::Document(*document_id))
            }
            Self::Document(_) | Self::UserMailer(_) => None,
        }
    }
}

impl From<&TargetEntity> for AccessTarget {
    fn from(entity: &TargetEntity) -> Self {
        match entity {
            TargetEntity::Document { document, .. } => Self::Document(document.id),
            TargetEntity::DocumentFile { file, .. } => Self::DocumentFile {
                id: file.id,
                document_id: file.document_id,
            },
            TargetEntity::DocumentVersion { version, .. } => Self::DocumentVersion {
                id: version.id,
                document_id: version.document_id,
            },
        }
    }
}

/// Decides whether an actor holds a permission on a target.
#[async_trait]
pub trait AccessGate: Send + Sync + std::fmt::Debug + 'static {
    /// Whether `user_id` holds `permission` on `target`.
    async fn has_access(
        &self,
        user_id: UserId,
        target: &AccessTarget,
        permission: Permission,
    ) -> AppResult<bool>;

    /// Like [`has_access`](Self::has_access) but returns an authorization
    /// error on denial.
    async fn check_access(
        &self,
        user_id: UserId,
        target: &AccessTarget,
        permission: Permission,
    ) -> AppResult<()> {
        if self.has_access(user_id, target, permission).await? {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Missing permission '{permission}' on {} {}",
                target.resource_type(),
                target.resource_id()
            )))
        }
    }
}
