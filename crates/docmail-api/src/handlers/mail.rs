//! Mail submission handlers.
//!
//! The same four handlers serve documents, document files and document
//! versions; the router attaches the [`TargetKind`] as an extension.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use axum_extra::extract::Query;

use docmail_core::types::{DeliveryMode, TargetKind};
use docmail_service::MailForm;

use crate::dto::request::redirect_target;
use crate::dto::{BatchMailQuery, MailResponse, RedirectQuery};
use crate::error::ApiError;
use crate::extractors::{AuthUser, RequestOrigin};
use crate::state::AppState;

/// POST /api/{kind}/mail?id=..
pub async fn mail_batch(
    State(state): State<AppState>,
    Extension(kind): Extension<TargetKind>,
    auth: AuthUser,
    origin: RequestOrigin,
    Query(query): Query<BatchMailQuery>,
    Json(form): Json<MailForm>,
) -> Result<Response, ApiError> {
    submit(&state, &auth, origin, kind, DeliveryMode::Attachment, &query.ids, query.next, form).await
}

/// POST /api/{kind}/mail-link?id=..
pub async fn mail_link_batch(
    State(state): State<AppState>,
    Extension(kind): Extension<TargetKind>,
    auth: AuthUser,
    origin: RequestOrigin,
    Query(query): Query<BatchMailQuery>,
    Json(form): Json<MailForm>,
) -> Result<Response, ApiError> {
    submit(&state, &auth, origin, kind, DeliveryMode::Link, &query.ids, query.next, form).await
}

/// POST /api/{kind}/{id}/mail
pub async fn mail_single(
    State(state): State<AppState>,
    Extension(kind): Extension<TargetKind>,
    auth: AuthUser,
    origin: RequestOrigin,
    Path(id): Path<i64>,
    Query(query): Query<RedirectQuery>,
    Json(form): Json<MailForm>,
) -> Result<Response, ApiError> {
    submit(&state, &auth, origin, kind, DeliveryMode::Attachment, &[id], query.next, form).await
}

/// POST /api/{kind}/{id}/mail-link
pub async fn mail_link_single(
    State(state): State<AppState>,
    Extension(kind): Extension<TargetKind>,
    auth: AuthUser,
    origin: RequestOrigin,
    Path(id): Path<i64>,
    Query(query): Query<RedirectQuery>,
    Json(form): Json<MailForm>,
) -> Result<Response, ApiError> {
    submit(&state, &auth, origin, kind, DeliveryMode::Link, &[id], query.next, form).await
}

#[allow(clippy::too_many_arguments)]
async fn submit(
    state: &AppState,
    auth: &AuthUser,
    origin: RequestOrigin,
    kind: TargetKind,
    mode: DeliveryMode,
    ids: &[i64],
    next: Option<String>,
    form: MailForm,
) -> Result<Response, ApiError> {
    let location = redirect_target(next.as_deref());
    let submission = state
        .mail_service
        .submit(auth.context(), kind, mode, ids, form, origin.into_inner())
        .await?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, location)],
        Json(MailResponse {
            queued: submission.queued,
            message: submission.message,
        }),
    )
        .into_response())
}
