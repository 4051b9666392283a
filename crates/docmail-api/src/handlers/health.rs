//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.database {
        Some(db) => match db.health_check().await {
            Ok(true) => "connected",
            _ => "unavailable",
        },
        None => "memory",
    };
    let storage = match state.storage.health_check().await {
        Ok(true) => "available",
        _ => "unavailable",
    };
    let status = if database == "unavailable" || storage == "unavailable" {
        "degraded"
    } else {
        "ok"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        storage: storage.to_string(),
    })
}
