//! # docmail-api
//!
//! HTTP API layer for DocMail built on Axum.
//!
//! Exposes the mail-by-document, mail-by-file and mail-by-version routes,
//! the health check, request logging and CORS middleware, the bearer token
//! extractor, and the mapping from [`AppError`](docmail_core::AppError) to
//! HTTP responses.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
