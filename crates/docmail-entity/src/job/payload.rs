//! Keyword arguments of the mail tasks.
//!
//! The controller serializes [`MailJobArgs`] into a flat JSON object and the
//! worker parses it back. The key set is fixed: `body`, `sender`, `subject`,
//! `recipient`, `user_mailer_id`, the kind-specific id key and
//! `organization_installation_url`, plus `as_attachment` for file and version
//! jobs. Anything else is rejected.

use docmail_core::types::{TargetKind, UserMailerId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const AS_ATTACHMENT: &str = "as_attachment";

/// Failure to parse task keyword arguments.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The arguments are not a JSON object.
    #[error("keyword arguments must be an object")]
    NotAnObject,
    /// An argument has the wrong type, is missing or is unknown.
    #[error("invalid keyword arguments: {0}")]
    Invalid(String),
}

/// Arguments of one mail job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailJobArgs {
    /// Kind of the target entity.
    pub kind: TargetKind,
    /// Email body template.
    pub body: String,
    /// Email address of the user who requested the send.
    pub sender: String,
    /// Email subject.
    pub subject: String,
    /// Recipient address.
    pub recipient: String,
    /// Mailer profile to send through.
    pub user_mailer_id: UserMailerId,
    /// Whether the entity content is attached. Always `false` for
    /// documents, whose jobs do not carry the flag.
    pub as_attachment: bool,
    /// Target entity id.
    pub target_id: Option<i64>,
    /// Base URL used to build links.
    pub organization_installation_url: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommonArgs {
    body: String,
    sender: String,
    subject: String,
    recipient: String,
    user_mailer_id: UserMailerId,
    #[serde(default)]
    organization_installation_url: Option<String>,
}

impl MailJobArgs {
    /// Serialize into task keyword arguments.
    pub fn to_kwargs(&self) -> Value {
        let mut map = Map::new();
        map.insert("body".into(), Value::from(self.body.clone()));
        map.insert("sender".into(), Value::from(self.sender.clone()));
        map.insert("subject".into(), Value::from(self.subject.clone()));
        map.insert("recipient".into(), Value::from(self.recipient.clone()));
        map.insert(
            "user_mailer_id".into(),
            Value::from(self.user_mailer_id.get()),
        );
        if self.kind.carries_attachment_flag() {
            map.insert(AS_ATTACHMENT.into(), Value::from(self.as_attachment));
        }
        map.insert(self.kind.id_key().into(), Value::from(self.target_id));
        map.insert(
            "organization_installation_url".into(),
            Value::from(self.organization_installation_url.clone()),
        );
        Value::Object(map)
    }

    /// Parse task keyword arguments for a task of `kind`.
    ///
    /// The kind-specific id key and the installation URL may be absent or
    /// null. Keys belonging to other kinds are unknown keys, and so is
    /// `as_attachment` on a document job.
    pub fn from_kwargs(kind: TargetKind, kwargs: &Value) -> Result<Self, PayloadError> {
        let mut map = kwargs.as_object().cloned().ok_or(PayloadError::NotAnObject)?;

        let target_id = match map.remove(kind.id_key()) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(n.as_i64().ok_or_else(|| {
                PayloadError::Invalid(format!("{} is not an integer", kind.id_key()))
            })?),
            Some(_) => {
                return Err(PayloadError::Invalid(format!(
                    "{} is not an integer",
                    kind.id_key()
                )));
            }
        };

        let as_attachment = match (kind.carries_attachment_flag(), map.remove(AS_ATTACHMENT)) {
            (true, Some(Value::Bool(flag))) => flag,
            (true, Some(_)) => {
                return Err(PayloadError::Invalid(format!("{AS_ATTACHMENT} is not a boolean")));
            }
            (true, None) => {
                return Err(PayloadError::Invalid(format!("missing field `{AS_ATTACHMENT}`")));
            }
            (false, Some(_)) => {
                return Err(PayloadError::Invalid(format!(
                    "unknown field `{AS_ATTACHMENT}` for {}",
                    kind.task_name()
                )));
            }
            (false, None) => false,
        };

        let common: CommonArgs = serde_json::from_value(Value::Object(map))
            .map_err(|e| PayloadError::Invalid(e.to_string()))?;

        Ok(Self {
            kind,
            body: common.body,
            sender: common.sender,
            subject: common.subject,
            recipient: common.recipient,
            user_mailer_id: common.user_mailer_id,
            as_attachment,
            target_id,
            organization_installation_url: common.organization_installation_url,
        })
    }
}
