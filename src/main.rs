//! DocMail Server: queued document delivery by email.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use docmail_auth::{AccessGate, AclChecker, JwtDecoder};
use docmail_core::config::{AppConfig, QueueBackend};
use docmail_core::error::AppError;
use docmail_core::traits::StorageProvider;
use docmail_database::memory::{
    MemoryAclStore, MemoryAuditStore, MemoryEntityStore, MemoryMailerStore,
};
use docmail_database::repositories::{
    AclRepository, AuditEventRepository, DocumentRepository, JobRepository, UserMailerRepository,
};
use docmail_database::{AclStore, AuditStore, DatabasePool, EntityResolver, EntityStore, MailerStore};
use docmail_mail::{MailBackendRegistry, MailComposer, MemoryBackend, MemoryOutbox, SmtpBackend};
use docmail_service::MailRequestService;
use docmail_storage::LocalStorageProvider;
use docmail_worker::jobs::{MailTaskDeps, mail_task_registry};
use docmail_worker::WorkerRunner;
use docmail_worker::queue::{ChannelQueue, JobQueue, JobSource, PgJobQueue};

#[tokio::main]
async fn main() {
    let env = std::env::var("DOCMAIL_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Record stores, either PostgreSQL-backed or in process memory.
struct Stores {
    database: Option<DatabasePool>,
    entities: Arc<dyn EntityStore>,
    mailers: Arc<dyn MailerStore>,
    acl: Arc<dyn AclStore>,
    audit: Arc<dyn AuditStore>,
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocMail v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Record stores ────────────────────────────────────
    let stores = if config.database.in_memory {
        tracing::warn!("Using in-memory stores; records will not survive a restart");
        Stores {
            database: None,
            entities: Arc::new(MemoryEntityStore::new()),
            mailers: Arc::new(MemoryMailerStore::new()),
            acl: Arc::new(MemoryAclStore::new()),
            audit: Arc::new(MemoryAuditStore::new()),
        }
    } else {
        tracing::info!("Connecting to database...");
        let db = DatabasePool::connect(&config.database).await?;
        docmail_database::migration::run_migrations(db.pool()).await?;
        tracing::info!("Database migrations complete");

        Stores {
            entities: Arc::new(DocumentRepository::new(db.pool().clone())),
            mailers: Arc::new(UserMailerRepository::new(db.pool().clone())),
            acl: Arc::new(AclRepository::new(db.pool().clone())),
            audit: Arc::new(AuditEventRepository::new(db.pool().clone())),
            database: Some(db),
        }
    };

    // ── Step 2: Document storage ─────────────────────────────────
    let storage: Arc<dyn StorageProvider> =
        Arc::new(LocalStorageProvider::new(&config.storage.root).await?);
    tracing::info!(root = %config.storage.root, "Storage provider initialized");

    // ── Step 3: Auth ─────────────────────────────────────────────
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let gate: Arc<dyn AccessGate> = Arc::new(AclChecker::new(Arc::clone(&stores.acl)));

    // ── Step 4: Mail backends ────────────────────────────────────
    let mut backends = MailBackendRegistry::new();
    backends.register(Arc::new(SmtpBackend));
    if config.database.in_memory {
        backends.register(Arc::new(MemoryBackend::new(Arc::new(MemoryOutbox::new()))));
    }
    let backends = Arc::new(backends);
    tracing::info!(backends = ?backends.names(), "Mail backends registered");

    // ── Step 5: Job queue ────────────────────────────────────────
    let worker_id = format!("worker-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
    let (queue, source): (Arc<dyn JobQueue>, Arc<dyn JobSource>) = match config.worker.backend {
        QueueBackend::Channel => {
            let channel = Arc::new(ChannelQueue::new(config.worker.channel_capacity));
            (channel.clone() as Arc<dyn JobQueue>, channel as Arc<dyn JobSource>)
        }
        QueueBackend::Postgres => {
            let db = stores.database.as_ref().ok_or_else(|| {
                AppError::configuration("The postgres queue backend requires a database")
            })?;
            let pg = Arc::new(PgJobQueue::new(
                JobRepository::new(db.pool().clone()),
                config.worker.queue.clone(),
                worker_id.clone(),
            ));
            (pg.clone() as Arc<dyn JobQueue>, pg as Arc<dyn JobSource>)
        }
    };
    tracing::info!(backend = ?config.worker.backend, queue = %config.worker.queue, "Job queue ready");

    // ── Step 6: Shutdown channel & worker ────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handle = if config.worker.enabled {
        let registry = mail_task_registry(MailTaskDeps {
            mailers: Arc::clone(&stores.mailers),
            resolver: EntityResolver::new(Arc::clone(&stores.entities)),
            composer: MailComposer::new(Arc::clone(&storage), config.storage.max_attachment_bytes),
            backends: Arc::clone(&backends),
            audit: Arc::clone(&stores.audit),
        });
        let runner = WorkerRunner::new(source, Arc::new(registry), &config.worker, worker_id);

        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            runner.run(worker_cancel).await;
        });
        tracing::info!("Background worker started");
        Some(handle)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 7: Build and start HTTP server ──────────────────────
    let mail_service = Arc::new(MailRequestService::new(
        EntityResolver::new(Arc::clone(&stores.entities)),
        Arc::clone(&stores.mailers),
        gate,
        queue,
        config.mail.clone(),
        config.worker.queue.clone(),
    ));

    let app_state = docmail_api::AppState {
        config: Arc::new(config.clone()),
        database: stores.database.clone(),
        storage,
        jwt_decoder,
        mail_service,
    };

    let app = docmail_api::build_router(app_state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("DocMail server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 8: Drain worker and close pool ──────────────────────
    if let Some(handle) = worker_handle {
        let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Worker did not stop within the shutdown grace period");
        }
    }
    if let Some(db) = &stores.database {
        db.close().await;
    }

    tracing::info!("DocMail server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
