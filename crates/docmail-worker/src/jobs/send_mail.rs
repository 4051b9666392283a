//! The mail dispatch task.
//!
//! One task type, parameterized by [`TargetKind`], re-resolves the mailer
//! and the entity at execution time, sends through the mailer's backend
//! and records an audit event. It runs once: failures are reported to the
//! runner and never retried.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use docmail_core::types::TargetKind;
use docmail_database::resolver::EntityResolver;
use docmail_database::store::{AuditStore, MailerStore};
use docmail_entity::audit::{CreateAuditEvent, EMAIL_SENT, ObjectRef};
use docmail_entity::job::{MailJobArgs, QueuedJob};
use docmail_mail::{ComposeRequest, MailBackendRegistry, MailComposer};

use crate::executor::{JobExecutionError, TaskHandler};

/// Collaborators shared by every mail task.
#[derive(Debug, Clone)]
pub struct MailTaskDeps {
    /// Mailer profile lookup.
    pub mailers: Arc<dyn MailerStore>,
    /// Entity lookup.
    pub resolver: EntityResolver,
    /// Message composition.
    pub composer: MailComposer,
    /// Transport selection.
    pub backends: Arc<MailBackendRegistry>,
    /// Audit log.
    pub audit: Arc<dyn AuditStore>,
}

/// Sends one document, document file or document version.
#[derive(Debug, Clone)]
pub struct SendMailTask {
    kind: TargetKind,
    deps: MailTaskDeps,
}

impl SendMailTask {
    /// Create the task for `kind`.
    pub fn new(kind: TargetKind, deps: MailTaskDeps) -> Self {
        Self { kind, deps }
    }
}

#[async_trait]
impl TaskHandler for SendMailTask {
    fn kind(&self) -> TargetKind {
        self.kind
    }

    async fn execute(&self, job: &QueuedJob) -> Result<(), JobExecutionError> {
        let args = MailJobArgs::from_kwargs(self.kind, &job.kwargs)
            .map_err(|e| JobExecutionError::Permanent(e.to_string()))?;

        let mailer = self
            .deps
            .mailers
            .find_by_id(args.user_mailer_id)
            .await?
            .ok_or_else(|| {
                JobExecutionError::Permanent(format!(
                    "Mailer {} does not exist",
                    args.user_mailer_id
                ))
            })?;

        let entity = match args.target_id {
            Some(id) => {
                let entity = self.deps.resolver.resolve_valid(self.kind, id).await?;
                if entity.is_none() {
                    warn!(
                        job_id = %job.id,
                        kind = %self.kind,
                        target_id = id,
                        "Target vanished before delivery, sending without it"
                    );
                }
                entity
            }
            None => None,
        };

        let email = self
            .deps
            .composer
            .compose(
                &mailer,
                &ComposeRequest {
                    recipient: &args.recipient,
                    subject: &args.subject,
                    body: &args.body,
                    as_attachment: args.as_attachment,
                    installation_url: args.organization_installation_url.as_deref(),
                    entity: entity.as_ref(),
                },
            )
            .await?;

        let transport = self
            .deps
            .backends
            .transport_for(&mailer)
            .map_err(|e| JobExecutionError::Internal(e.into()))?;
        transport
            .send(&email)
            .await
            .map_err(|e| JobExecutionError::Internal(e.into()))?;

        self.deps
            .audit
            .record(&CreateAuditEvent {
                verb: EMAIL_SENT.to_string(),
                actor: args.sender.clone(),
                target: ObjectRef::new("user_mailer", mailer.id.get()),
                action_object: entity
                    .as_ref()
                    .map(|e| ObjectRef::new(e.kind().as_str(), e.id())),
            })
            .await?;

        info!(
            job_id = %job.id,
            kind = %self.kind,
            mailer_id = %mailer.id,
            target_id = ?args.target_id,
            attachments = email.attachments.len(),
            "Email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use docmail_core::types::UserMailerId;
    use docmail_database::memory::{MemoryAuditStore, MemoryEntityStore, MemoryMailerStore};
    use docmail_mail::{MemoryBackend, MemoryOutbox};
    use docmail_storage::MemoryStorageProvider;

    struct Fixture {
        entities: Arc<MemoryEntityStore>,
        mailers: Arc<MemoryMailerStore>,
        storage: Arc<MemoryStorageProvider>,
        audit: Arc<MemoryAuditStore>,
        outbox: Arc<MemoryOutbox>,
        deps: MailTaskDeps,
    }

    fn fixture() -> Fixture {
        let entities = Arc::new(MemoryEntityStore::new());
        let mailers = Arc::new(MemoryMailerStore::new());
        let storage = Arc::new(MemoryStorageProvider::new());
        let audit = Arc::new(MemoryAuditStore::new());
        let outbox = Arc::new(MemoryOutbox::new());
        let mut backends = MailBackendRegistry::new();
        backends.register(Arc::new(MemoryBackend::new(outbox.clone())));

        let deps = MailTaskDeps {
            mailers: mailers.clone(),
            resolver: EntityResolver::new(entities.clone()),
            composer: MailComposer::new(storage.clone(), 1024 * 1024),
            backends: Arc::new(backends),
            audit: audit.clone(),
        };
        Fixture {
            entities,
            mailers,
            storage,
            audit,
            outbox,
            deps,
        }
    }

    fn args(kind: TargetKind, mailer: UserMailerId, target: Option<i64>, attach: bool) -> MailJobArgs {
        MailJobArgs {
            kind,
            body: "{{ link }}".into(),
            sender: "owner@example.com".into(),
            subject: "{{ document }}".into(),
            recipient: "to@example.com".into(),
            user_mailer_id: mailer,
            as_attachment: attach && kind.carries_attachment_flag(),
            target_id: target,
            organization_installation_url: Some("http://dms".into()),
        }
    }

    fn job(args: &MailJobArgs) -> QueuedJob {
        QueuedJob::new("mailing", args.kind.task_name(), args.to_kwargs())
    }

    #[tokio::test]
    async fn test_sends_file_attachment_and_records_event() {
        let f = fixture();
        let mailer = f.mailers.add(
            "ops",
            "memory",
            serde_json::json!({"from": "dms@example.com"}),
            true,
        );
        let doc = f.entities.add_document("Contract");
        let file = f.entities.add_file(doc.id, "contract.txt", "f/contract.txt");
        f.storage.put("f/contract.txt", Bytes::from_static(b"terms"));

        let task = SendMailTask::new(TargetKind::DocumentFile, f.deps.clone());
        let a = args(TargetKind::DocumentFile, mailer.id, Some(file.id.get()), true);
        task.execute(&job(&a)).await.expect("sent");

        let sent = f.outbox.messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from.as_deref(), Some("dms@example.com"));
        assert_eq!(sent[0].to, vec!["to@example.com".to_string()]);
        assert_eq!(sent[0].attachments.len(), 1);
        assert_eq!(sent[0].attachments[0].data, Bytes::from_static(b"terms"));

        let events = f.audit.all().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].verb, EMAIL_SENT);
        assert_eq!(events[0].actor, "owner@example.com");
        assert_eq!(events[0].target(), ObjectRef::new("user_mailer", mailer.id.get()));
        assert_eq!(
            events[0].action_object(),
            Some(ObjectRef::new("document_file", file.id.get()))
        );
    }

    #[tokio::test]
    async fn test_vanished_target_still_sends() {
        let f = fixture();
        let mailer = f.mailers.add("ops", "memory", serde_json::json!({}), true);
        let doc = f.entities.add_document("Gone");
        f.entities.delete_document(doc.id);

        let task = SendMailTask::new(TargetKind::Document, f.deps.clone());
        let a = args(TargetKind::Document, mailer.id, Some(doc.id.get()), true);
        task.execute(&job(&a)).await.expect("sent");

        let sent = f.outbox.messages().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].attachments.is_empty());
        assert_eq!(sent[0].body, "");

        let events = f.audit.all().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action_object(), None);
    }

    #[tokio::test]
    async fn test_document_job_sends_link_without_content() {
        let f = fixture();
        let mailer = f.mailers.add("ops", "memory", serde_json::json!({}), true);
        let doc = f.entities.add_document("Contract");
        f.entities.add_file(doc.id, "contract.txt", "f/contract.txt");
        f.storage.put("f/contract.txt", Bytes::from_static(b"terms"));

        let task = SendMailTask::new(TargetKind::Document, f.deps.clone());
        let a = args(TargetKind::Document, mailer.id, Some(doc.id.get()), true);
        assert!(a.to_kwargs().get("as_attachment").is_none());
        task.execute(&job(&a)).await.expect("sent");

        let sent = f.outbox.messages().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].attachments.is_empty());
        assert_eq!(
            sent[0].body,
            format!("http://dms/documents/documents/{}/preview/", doc.id)
        );
    }

    #[tokio::test]
    async fn test_missing_mailer_is_permanent_failure() {
        let f = fixture();
        let doc = f.entities.add_document("Doc");
        let task = SendMailTask::new(TargetKind::Document, f.deps.clone());
        let a = args(TargetKind::Document, UserMailerId(404), Some(doc.id.get()), false);

        let err = task.execute(&job(&a)).await.unwrap_err();
        assert!(matches!(err, JobExecutionError::Permanent(_)));
        assert!(f.outbox.is_empty().await);
        assert!(f.audit.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_extra_kwarg_is_rejected() {
        let f = fixture();
        let mailer = f.mailers.add("ops", "memory", serde_json::json!({}), true);
        let a = args(TargetKind::DocumentVersion, mailer.id, None, false);
        let mut kwargs = a.to_kwargs();
        kwargs["retries"] = serde_json::json!(3);

        let task = SendMailTask::new(TargetKind::DocumentVersion, f.deps.clone());
        let err = task
            .execute(&QueuedJob::new("mailing", "send_document_version", kwargs))
            .await
            .unwrap_err();
        assert!(matches!(err, JobExecutionError::Permanent(_)));
        assert!(f.outbox.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_backend_fails_without_audit() {
        let f = fixture();
        let mailer = f.mailers.add("fax", "fax", serde_json::json!({}), false);
        let doc = f.entities.add_document("Doc");
        let task = SendMailTask::new(TargetKind::Document, f.deps.clone());
        let a = args(TargetKind::Document, mailer.id, Some(doc.id.get()), false);

        let err = task.execute(&job(&a)).await.unwrap_err();
        assert!(matches!(err, JobExecutionError::Internal(_)));
        assert!(f.audit.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_version_link_points_at_version() {
        let f = fixture();
        let mailer = f.mailers.add("ops", "memory", serde_json::json!({}), true);
        let doc = f.entities.add_document("Plan");
        let version = f.entities.add_version(doc.id, None);

        let task = SendMailTask::new(TargetKind::DocumentVersion, f.deps.clone());
        let a = args(TargetKind::DocumentVersion, mailer.id, Some(version.id.get()), false);
        task.execute(&job(&a)).await.expect("sent");

        let sent = f.outbox.messages().await;
        assert_eq!(
            sent[0].body,
            format!("http://dms/documents/documents/versions/{}/preview/", version.id)
        );
        assert_eq!(sent[0].subject, format!("Plan - version {}", version.id));
    }
}
