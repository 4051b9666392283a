//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use docmail_api::{AppState, build_router};
use docmail_auth::{AclChecker, JwtDecoder, JwtEncoder};
use docmail_core::config::AppConfig;
use docmail_core::types::UserId;
use docmail_database::memory::{
    MemoryAclStore, MemoryAuditStore, MemoryEntityStore, MemoryMailerStore,
};
use docmail_database::{AclStore, EntityResolver};
use docmail_entity::mailer::UserMailer;
use docmail_entity::permission::{CreateAclEntry, Permission};
use docmail_mail::{MailBackendRegistry, MailComposer, MemoryBackend, MemoryOutbox};
use docmail_service::MailRequestService;
use docmail_storage::MemoryStorageProvider;
use docmail_worker::jobs::{MailTaskDeps, mail_task_registry};
use docmail_worker::queue::ChannelQueue;
use docmail_worker::{DrainReport, WorkerRunner};

/// Host header sent with every request.
pub const HOST: &str = "dms.test";

/// Sender address configured on test mailers.
pub const FROM: &str = "noreply@dms.test";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Documents, files and versions
    pub entities: Arc<MemoryEntityStore>,
    /// Mailer profiles
    pub mailers: Arc<MemoryMailerStore>,
    /// ACL entries
    pub acl: Arc<MemoryAclStore>,
    /// Recorded audit events
    pub audit: Arc<MemoryAuditStore>,
    /// Document content
    pub storage: Arc<MemoryStorageProvider>,
    /// Every email the worker sent
    pub outbox: Arc<MemoryOutbox>,
    runner: WorkerRunner,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.database.in_memory = true;

        let entities = Arc::new(MemoryEntityStore::new());
        let mailers = Arc::new(MemoryMailerStore::new());
        let acl = Arc::new(MemoryAclStore::new());
        let audit = Arc::new(MemoryAuditStore::new());
        let storage = Arc::new(MemoryStorageProvider::new());
        let outbox = Arc::new(MemoryOutbox::new());
        let queue = Arc::new(ChannelQueue::new(config.worker.channel_capacity));

        let mut backends = MailBackendRegistry::new();
        backends.register(Arc::new(MemoryBackend::new(outbox.clone())));

        let registry = mail_task_registry(MailTaskDeps {
            mailers: mailers.clone(),
            resolver: EntityResolver::new(entities.clone()),
            composer: MailComposer::new(storage.clone(), config.storage.max_attachment_bytes),
            backends: Arc::new(backends),
            audit: audit.clone(),
        });
        let runner = WorkerRunner::new(queue.clone(), Arc::new(registry), &config.worker, "test-worker");

        let mail_service = MailRequestService::new(
            EntityResolver::new(entities.clone()),
            mailers.clone(),
            Arc::new(AclChecker::new(acl.clone())),
            queue,
            config.mail.clone(),
            config.worker.queue.clone(),
        );

        let state = AppState {
            config: Arc::new(config.clone()),
            database: None,
            storage: storage.clone(),
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            mail_service: Arc::new(mail_service),
        };

        Self {
            router: build_router(state),
            entities,
            mailers,
            acl,
            audit,
            storage,
            outbox,
            runner,
            encoder: JwtEncoder::new(&config.auth),
        }
    }

    /// Access token for `user_id`, whose address is [`sender_email`].
    pub fn token(&self, user_id: i64) -> String {
        self.encoder
            .issue(UserId(user_id), &sender_email(user_id), Some("tester"))
            .expect("Failed to issue token")
    }

    /// Add an enabled default mailer delivering into the outbox.
    pub fn add_mailer(&self) -> UserMailer {
        self.mailers
            .add("Office", "memory", serde_json::json!({ "from": FROM }), true)
    }

    /// Grant `permission` on one resource.
    pub async fn grant(&self, user_id: i64, resource_type: &str, resource_id: i64, permission: Permission) {
        self.acl
            .grant(&CreateAclEntry {
                resource_type: resource_type.to_string(),
                resource_id: Some(resource_id),
                user_id: UserId(user_id),
                permission,
            })
            .await
            .expect("Failed to grant permission");
    }

    /// Run every queued job.
    pub async fn drain(&self) -> DrainReport {
        self.runner.drain().await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Host", HOST)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            location,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Location header, if any
    pub location: Option<String>,
    /// Parsed JSON body
    pub body: Value,
}

/// Email address carried in the token of `user_id`.
pub fn sender_email(user_id: i64) -> String {
    format!("user{user_id}@dms.test")
}

/// Form body addressed to `recipient`.
pub fn form(recipient: &str) -> Value {
    serde_json::json!({ "recipient": recipient })
}
