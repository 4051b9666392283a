//! Mailing permissions.

use docmail_core::types::{DeliveryMode, TargetKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission checked by the mailing entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "mailing_permission", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Email a document as an attachment.
    SendDocumentAttachment,
    /// Email a link to a document.
    SendDocumentLink,
    /// Email a document file as an attachment.
    SendDocumentFileAttachment,
    /// Email a link to a document file.
    SendDocumentFileLink,
    /// Email a document version as an attachment.
    SendDocumentVersionAttachment,
    /// Email a link to a document version.
    SendDocumentVersionLink,
    /// Send through a mailer profile.
    UserMailerUse,
}

impl Permission {
    /// The permission needed to send an entity of `kind` in `mode`.
    pub fn for_send(kind: TargetKind, mode: DeliveryMode) -> Self {
        match (kind, mode) {
            (TargetKind::Document, DeliveryMode::Attachment) => Self::SendDocumentAttachment,
            (TargetKind::Document, DeliveryMode::Link) => Self::SendDocumentLink,
            (TargetKind::DocumentFile, DeliveryMode::Attachment) => {
                Self::SendDocumentFileAttachment
            }
            (TargetKind::DocumentFile, DeliveryMode::Link) => Self::SendDocumentFileLink,
            (TargetKind::DocumentVersion, DeliveryMode::Attachment) => {
                Self::SendDocumentVersionAttachment
            }
            (TargetKind::DocumentVersion, DeliveryMode::Link) => Self::SendDocumentVersionLink,
        }
    }

    /// Return the permission as a snake-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SendDocumentAttachment => "send_document_attachment",
            Self::SendDocumentLink => "send_document_link",
            Self::SendDocumentFileAttachment => "send_document_file_attachment",
            Self::SendDocumentFileLink => "send_document_file_link",
            Self::SendDocumentVersionAttachment => "send_document_version_attachment",
            Self::SendDocumentVersionLink => "send_document_version_link",
            Self::UserMailerUse => "user_mailer_use",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "send_document_attachment" => Ok(Self::SendDocumentAttachment),
            "send_document_link" => Ok(Self::SendDocumentLink),
            "send_document_file_attachment" => Ok(Self::SendDocumentFileAttachment),
            "send_document_file_link" => Ok(Self::SendDocumentFileLink),
            "send_document_version_attachment" => Ok(Self::SendDocumentVersionAttachment),
            "send_document_version_link" => Ok(Self::SendDocumentVersionLink),
            "user_mailer_use" => Ok(Self::UserMailerUse),
            _ => Err(format!("Unknown permission: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_and_attachment_are_distinct() {
        for kind in TargetKind::ALL {
            assert_ne!(
                Permission::for_send(kind, DeliveryMode::Attachment),
                Permission::for_send(kind, DeliveryMode::Link)
            );
        }
    }

    #[test]
    fn test_string_round_trip() {
        let p: Permission = "send_document_file_link".parse().expect("parses");
        assert_eq!(p, Permission::SendDocumentFileLink);
        assert_eq!(p.to_string(), "send_document_file_link");
    }
}
