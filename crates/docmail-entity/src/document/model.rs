//! Document entity models.
//!
//! Only the columns needed to address an entity, build a link to it and
//! read its content are modelled. Documents are owned by the host
//! application.

use chrono::{DateTime, Utc};
use docmail_core::types::{DocumentFileId, DocumentId, DocumentVersionId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Primary key.
    pub id: DocumentId,
    /// Display label.
    pub label: String,
    /// Whether the document has been moved to the trash.
    pub in_trash: bool,
    /// When the document was trashed.
    pub trashed_at: Option<DateTime<Utc>>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Whether the document can be addressed by users.
    pub fn is_valid(&self) -> bool {
        !self.in_trash
    }
}

/// A file uploaded to a document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentFile {
    /// Primary key.
    pub id: DocumentFileId,
    /// Owning document.
    pub document_id: DocumentId,
    /// Original filename.
    pub filename: String,
    /// MIME type detected on upload.
    pub mimetype: Option<String>,
    /// Path of the content within the storage provider.
    pub storage_path: String,
    /// Size in bytes.
    pub size: i64,
    /// Upload timestamp.
    pub timestamp: DateTime<Utc>,
}

/// A version of a document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentVersion {
    /// Primary key.
    pub id: DocumentVersionId,
    /// Owning document.
    pub document_id: DocumentId,
    /// Free-form comment.
    pub comment: Option<String>,
    /// Whether this is the active version of its document.
    pub active: bool,
    /// Path of the exported content within the storage provider.
    pub storage_path: Option<String>,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
}

impl DocumentVersion {
    /// Filename used when the version is attached to an email.
    pub fn export_filename(&self, document: &Document) -> String {
        format!("{} - version {}.pdf", document.label, self.id)
    }
}
