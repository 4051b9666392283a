//! Custom Axum extractors.

pub mod auth;
pub mod origin;

pub use auth::AuthUser;
pub use origin::RequestOrigin;
