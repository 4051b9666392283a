//! Request and response bodies.

pub mod request;
pub mod response;

pub use request::{BatchMailQuery, RedirectQuery};
pub use response::{HealthResponse, MailResponse};
