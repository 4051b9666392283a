//! Query parameters accepted by the mail routes.

use axum::http::HeaderValue;
use serde::Deserialize;

/// `?id=1&id=2&next=/documents` on the batch routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchMailQuery {
    /// Target ids, repeated.
    #[serde(default, rename = "id")]
    pub ids: Vec<i64>,
    /// Where to send the browser afterwards.
    #[serde(default)]
    pub next: Option<String>,
}

/// `?next=/documents` on the single-target routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedirectQuery {
    /// Where to send the browser afterwards.
    #[serde(default)]
    pub next: Option<String>,
}

/// Redirect target: `next` when it is a local path usable as a `Location`
/// header, `/` otherwise. Paths starting with `//` or `/\` are
/// protocol-relative to browsers and are refused.
pub fn redirect_target(next: Option<&str>) -> String {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && HeaderValue::from_str(path).is_ok() =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}
