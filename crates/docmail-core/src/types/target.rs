//! The closed set of things that can be emailed, and how.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Kind of entity a mail job refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// A document.
    Document,
    /// A file uploaded to a document.
    DocumentFile,
    /// A version of a document.
    DocumentVersion,
}

impl TargetKind {
    /// All kinds, in registration order.
    pub const ALL: [TargetKind; 3] = [
        TargetKind::Document,
        TargetKind::DocumentFile,
        TargetKind::DocumentVersion,
    ];

    /// Snake-case name used for resource types and ACL entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::DocumentFile => "document_file",
            Self::DocumentVersion => "document_version",
        }
    }

    /// Name of the background task that sends this kind.
    pub fn task_name(&self) -> &'static str {
        match self {
            Self::Document => "send_document",
            Self::DocumentFile => "send_document_file",
            Self::DocumentVersion => "send_document_version",
        }
    }

    /// Resolve a task name back into its kind.
    pub fn from_task_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.task_name() == name)
    }

    /// Keyword-argument key carrying the entity id.
    pub fn id_key(&self) -> &'static str {
        match self {
            Self::Document => "document_id",
            Self::DocumentFile => "document_file_id",
            Self::DocumentVersion => "document_version_id",
        }
    }

    /// Whether jobs of this kind carry the `as_attachment` argument.
    /// Document jobs always send without content.
    pub fn carries_attachment_flag(&self) -> bool {
        !matches!(self, Self::Document)
    }

    /// Human label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::DocumentFile => "document file",
            Self::DocumentVersion => "document version",
        }
    }

    /// Path of the entity relative to the installation URL.
    pub fn link_path(&self, id: i64) -> String {
        match self {
            Self::Document => format!("documents/documents/{id}/preview/"),
            Self::DocumentFile => format!("documents/documents/files/{id}/preview/"),
            Self::DocumentVersion => format!("documents/documents/versions/{id}/preview/"),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown target kind '{s}'")))
    }
}

/// Whether the email carries the entity content or a link to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Content is attached to the email.
    Attachment,
    /// The email carries a link back to the installation.
    Link,
}

impl DeliveryMode {
    /// Value of the `as_attachment` job argument.
    pub fn as_attachment(&self) -> bool {
        matches!(self, Self::Attachment)
    }
}
