//! A resolved entity of any target kind.

use docmail_core::types::TargetKind;
use serde::{Deserialize, Serialize};

use super::model::{Document, DocumentFile, DocumentVersion};

/// An entity resolved for a mail job, together with its parent document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetEntity {
    /// A document. Document emails never carry content.
    Document {
        /// The document.
        document: Document,
    },
    /// A document file.
    DocumentFile {
        /// The file.
        file: DocumentFile,
        /// The file's document.
        document: Document,
    },
    /// A document version.
    DocumentVersion {
        /// The version.
        version: DocumentVersion,
        /// The version's document.
        document: Document,
    },
}

impl TargetEntity {
    /// Kind of this entity.
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Document { .. } => TargetKind::Document,
            Self::DocumentFile { .. } => TargetKind::DocumentFile,
            Self::DocumentVersion { .. } => TargetKind::DocumentVersion,
        }
    }

    /// Primary key of the entity itself.
    pub fn id(&self) -> i64 {
        match self {
            Self::Document { document, .. } => document.id.get(),
            Self::DocumentFile { file, .. } => file.id.get(),
            Self::DocumentVersion { version, .. } => version.id.get(),
        }
    }

    /// The document this entity belongs to.
    pub fn document(&self) -> &Document {
        match self {
            Self::Document { document, .. }
            | Self::DocumentFile { document, .. }
            | Self::DocumentVersion { document, .. } => document,
        }
    }

    /// Text substituted for `{{ document }}` in subjects and bodies.
    pub fn display_name(&self) -> String {
        match self {
            Self::Document { document, .. } => document.label.clone(),
            Self::DocumentFile { file, .. } => file.filename.clone(),
            Self::DocumentVersion { version, document } => {
                format!("{} - version {}", document.label, version.id)
            }
        }
    }

    /// Storage path, filename and MIME type of the attachable content.
    ///
    /// Returns `None` for documents and for versions without a rendered
    /// export.
    pub fn attachment_source(&self) -> Option<(String, String, Option<String>)> {
        match self {
            Self::Document { .. } => None,
            Self::DocumentFile { file, .. } => Some((
                file.storage_path.clone(),
                file.filename.clone(),
                file.mimetype.clone(),
            )),
            Self::DocumentVersion { version, document } => {
                version.storage_path.as_ref().map(|path| {
                    (
                        path.clone(),
                        version.export_filename(document),
                        Some("application/pdf".to_string()),
                    )
                })
            }
        }
    }
}
