//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use docmail_auth::jwt::JwtDecoder;
use docmail_core::config::AppConfig;
use docmail_core::traits::storage::StorageProvider;
use docmail_database::DatabasePool;
use docmail_service::MailRequestService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent when running on in-memory stores
    pub database: Option<DatabasePool>,
    /// Document content storage
    pub storage: Arc<dyn StorageProvider>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Mail request controller
    pub mail_service: Arc<MailRequestService>,
}
