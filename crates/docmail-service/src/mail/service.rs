//! Permission-checked queuing of mail jobs.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use docmail_auth::acl::{AccessGate, AccessTarget};
use docmail_core::config::MailConfig;
use docmail_core::error::AppError;
use docmail_core::result::AppResult;
use docmail_core::types::{DeliveryMode, TargetKind};
use docmail_database::resolver::EntityResolver;
use docmail_database::store::MailerStore;
use docmail_entity::document::TargetEntity;
use docmail_entity::job::{MailJobArgs, QueuedJob};
use docmail_entity::mailer::UserMailer;
use docmail_entity::permission::Permission;
use docmail_worker::queue::JobQueue;

use super::form::{MailForm, describe};
use crate::context::RequestContext;

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSubmission {
    /// Number of jobs enqueued.
    pub queued: usize,
    /// User-facing confirmation.
    pub message: String,
}

/// Validates send requests and enqueues mail jobs.
#[derive(Debug, Clone)]
pub struct MailRequestService {
    resolver: EntityResolver,
    mailers: Arc<dyn MailerStore>,
    gate: Arc<dyn AccessGate>,
    queue: Arc<dyn JobQueue>,
    mail_config: MailConfig,
    queue_name: String,
}

impl MailRequestService {
    /// Creates a new mail request service.
    pub fn new(
        resolver: EntityResolver,
        mailers: Arc<dyn MailerStore>,
        gate: Arc<dyn AccessGate>,
        queue: Arc<dyn JobQueue>,
        mail_config: MailConfig,
        queue_name: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            mailers,
            gate,
            queue,
            mail_config,
            queue_name: queue_name.into(),
        }
    }

    /// Queue one email per addressable target the actor may send.
    ///
    /// Missing, trashed and unauthorized targets are dropped silently. If
    /// none remain the request is `NotFound`; if the actor may not use the
    /// mailer nothing is queued and the request is `Authorization`. The
    /// jobs are enqueued as one batch: when the queue cannot take all of
    /// them none is queued.
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        kind: TargetKind,
        mode: DeliveryMode,
        ids: &[i64],
        form: MailForm,
        installation_url: Option<String>,
    ) -> AppResult<MailSubmission> {
        let form = self.with_defaults(form, mode);
        form.validate()
            .map_err(|e| AppError::validation(describe(&e)))?;

        let mailer = self.select_mailer(&form).await?;

        let permission = Permission::for_send(kind, mode);
        let mut targets: Vec<TargetEntity> = Vec::new();
        let mut seen = HashSet::new();
        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            let Some(entity) = self.resolver.resolve_valid(kind, id).await? else {
                debug!(kind = %kind, id, "Skipping unaddressable target");
                continue;
            };
            if self
                .gate
                .has_access(ctx.user_id, &AccessTarget::from(&entity), permission)
                .await?
            {
                targets.push(entity);
            } else {
                debug!(kind = %kind, id, user_id = %ctx.user_id, "Skipping target without permission");
            }
        }

        if targets.is_empty() {
            return Err(AppError::not_found(format!("No {} found", kind.label())));
        }

        self.gate
            .check_access(
                ctx.user_id,
                &AccessTarget::UserMailer(mailer.id),
                Permission::UserMailerUse,
            )
            .await?;

        let installation_url = self
            .mail_config
            .installation_url
            .clone()
            .or(installation_url);
        let subject = form.subject.unwrap_or_default();
        let body = form.body.unwrap_or_default();

        let jobs: Vec<QueuedJob> = targets
            .iter()
            .map(|entity| {
                let args = MailJobArgs {
                    kind,
                    body: body.clone(),
                    sender: ctx.email.clone(),
                    subject: subject.clone(),
                    recipient: form.recipient.clone(),
                    user_mailer_id: mailer.id,
                    as_attachment: mode.as_attachment() && kind.carries_attachment_flag(),
                    target_id: Some(entity.id()),
                    organization_installation_url: installation_url.clone(),
                };
                QueuedJob::new(self.queue_name.clone(), kind.task_name(), args.to_kwargs())
            })
            .collect();
        let queued = jobs.len();
        self.queue.enqueue_batch(jobs).await?;

        info!(
            user_id = %ctx.user_id,
            kind = %kind,
            mode = ?mode,
            mailer_id = %mailer.id,
            queued,
            "Queued mail jobs"
        );

        Ok(MailSubmission {
            queued,
            message: success_message(kind, mode, queued),
        })
    }

    fn with_defaults(&self, mut form: MailForm, mode: DeliveryMode) -> MailForm {
        if form.subject.is_none() {
            form.subject = Some(self.mail_config.default_subject.clone());
        }
        if form.body.is_none() {
            form.body = Some(match mode {
                DeliveryMode::Attachment => self.mail_config.attachment_body.clone(),
                DeliveryMode::Link => self.mail_config.link_body.clone(),
            });
        }
        form
    }

    async fn select_mailer(&self, form: &MailForm) -> AppResult<UserMailer> {
        let mailer = match form.user_mailer_id {
            Some(id) => self
                .mailers
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::validation(format!("Mailer {id} does not exist")))?,
            None => self
                .mailers
                .find_default()
                .await?
                .ok_or_else(|| AppError::validation("No default mailer is configured"))?,
        };

        if !mailer.enabled {
            return Err(AppError::validation(format!(
                "Mailer '{}' is disabled",
                mailer.label
            )));
        }
        Ok(mailer)
    }
}

/// `"1 document queued for email delivery"`,
/// `"3 document file links queued for email delivery"`.
pub fn success_message(kind: TargetKind, mode: DeliveryMode, count: usize) -> String {
    let noun = match mode {
        DeliveryMode::Attachment => kind.label().to_string(),
        DeliveryMode::Link => format!("{} link", kind.label()),
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{plural} queued for email delivery")
}
