//! Backend-independent email representation.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A file attached to an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAttachment {
    /// Filename shown to the recipient.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Content.
    pub data: Bytes,
}

impl EmailAttachment {
    /// Create an attachment, guessing the MIME type from the filename when
    /// none is given.
    pub fn new(filename: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        let filename = filename.into();
        let content_type = content_type.unwrap_or_else(|| {
            mime_guess::from_path(&filename)
                .first()
                .map(|mime| mime.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string())
        });
        Self {
            filename,
            content_type,
            data,
        }
    }
}

/// A plain-text email ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    /// Sender address; backends fall back to their own default when unset.
    pub from: Option<String>,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Attachments.
    pub attachments: Vec<EmailAttachment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_mime_is_guessed() {
        let a = EmailAttachment::new("report.pdf", None, Bytes::from_static(b"%PDF"));
        assert_eq!(a.content_type, "application/pdf");

        let b = EmailAttachment::new("blob", None, Bytes::new());
        assert_eq!(b.content_type, "application/octet-stream");
    }

    #[test]
    fn test_explicit_mime_wins() {
        let a = EmailAttachment::new("scan.bin", Some("image/tiff".into()), Bytes::new());
        assert_eq!(a.content_type, "image/tiff");
    }
}
