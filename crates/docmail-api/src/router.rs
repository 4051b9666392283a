//! Route definitions for the DocMail HTTP API.
//!
//! All routes are mounted under `/api`. The mail routes for each target
//! kind share handlers and differ only in the `TargetKind` extension.

use axum::{
    Extension, Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use docmail_core::types::TargetKind;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Largest accepted form body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let mut api_routes = Router::new().route("/health", get(handlers::health::health));
    for kind in TargetKind::ALL {
        api_routes = api_routes.nest(route_prefix(kind), mail_routes(kind));
    }

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Path segment under `/api` for a target kind.
pub fn route_prefix(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Document => "/documents",
        TargetKind::DocumentFile => "/document-files",
        TargetKind::DocumentVersion => "/document-versions",
    }
}

/// Attachment and link submission, batch and single.
fn mail_routes(kind: TargetKind) -> Router<AppState> {
    Router::new()
        .route("/mail", post(handlers::mail::mail_batch))
        .route("/mail-link", post(handlers::mail::mail_link_batch))
        .route("/{id}/mail", post(handlers::mail::mail_single))
        .route("/{id}/mail-link", post(handlers::mail::mail_link_single))
        .layer(Extension(kind))
}
