//! Base URL of the request, used to build links back to documents.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// `scheme://host` as seen by the client, when a Host header is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin(pub Option<String>);

impl RequestOrigin {
    /// Derive the origin from `X-Forwarded-Proto` / `X-Forwarded-Host`,
    /// falling back to `http` and the `Host` header.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let scheme = header("x-forwarded-proto").unwrap_or("http");
        let origin = header("x-forwarded-host")
            .or_else(|| header("host"))
            .map(|host| format!("{scheme}://{host}"));
        Self(origin)
    }

    /// The origin, if known.
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
