//! Turns a resolved target entity into an [`OutgoingEmail`].

use std::sync::Arc;

use tracing::debug;

use docmail_core::error::AppError;
use docmail_core::result::AppResult;
use docmail_core::traits::StorageProvider;
use docmail_entity::document::TargetEntity;
use docmail_entity::mailer::UserMailer;

use crate::message::{EmailAttachment, OutgoingEmail};

/// Everything needed to compose one email.
#[derive(Debug, Clone)]
pub struct ComposeRequest<'a> {
    /// Recipient address.
    pub recipient: &'a str,
    /// Subject template.
    pub subject: &'a str,
    /// Body template.
    pub body: &'a str,
    /// Whether the entity content is attached.
    pub as_attachment: bool,
    /// Base URL for links.
    pub installation_url: Option<&'a str>,
    /// The entity, or `None` when it vanished before the job ran.
    pub entity: Option<&'a TargetEntity>,
}

/// Composes emails, reading attachment content from storage.
#[derive(Debug, Clone)]
pub struct MailComposer {
    storage: Arc<dyn StorageProvider>,
    max_attachment_bytes: u64,
}

impl MailComposer {
    /// Create a composer.
    pub fn new(storage: Arc<dyn StorageProvider>, max_attachment_bytes: u64) -> Self {
        Self {
            storage,
            max_attachment_bytes,
        }
    }

    /// Compose an email sent through `mailer`.
    ///
    /// Without an entity the placeholders render empty and nothing is
    /// attached.
    pub async fn compose(
        &self,
        mailer: &UserMailer,
        request: &ComposeRequest<'_>,
    ) -> AppResult<OutgoingEmail> {
        let link = request
            .entity
            .map(|e| build_link(request.installation_url, e))
            .unwrap_or_default();
        let document = request
            .entity
            .map(TargetEntity::display_name)
            .unwrap_or_default();

        let mut attachments = Vec::new();
        if request.as_attachment {
            if let Some((path, filename, mimetype)) =
                request.entity.and_then(TargetEntity::attachment_source)
            {
                let size = self.storage.size(&path).await?;
                if size > self.max_attachment_bytes {
                    return Err(AppError::validation(format!(
                        "Attachment '{filename}' is {size} bytes, limit is {}",
                        self.max_attachment_bytes
                    )));
                }
                let data = self.storage.read_bytes(&path).await?;
                debug!(filename = %filename, bytes = data.len(), "Attaching content");
                attachments.push(EmailAttachment::new(filename, mimetype, data));
            }
        }

        Ok(OutgoingEmail {
            from: mailer.from_address().map(str::to_string),
            to: vec![request.recipient.to_string()],
            subject: render(request.subject, &link, &document),
            body: render(request.body, &link, &document),
            attachments,
        })
    }
}

/// Absolute link to an entity's preview page.
pub fn build_link(installation_url: Option<&str>, entity: &TargetEntity) -> String {
    let base = installation_url.unwrap_or("").trim_end_matches('/');
    format!("{base}/{}", entity.kind().link_path(entity.id()))
}

/// Substitute `{{ link }}` and `{{ document }}` (spacing inside the braces
/// is optional).
fn render(template: &str, link: &str, document: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        match after[..end].trim() {
            "link" => out.push_str(link),
            "document" => out.push_str(document),
            _ => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}
