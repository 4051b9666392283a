//! Mail request handling.

pub mod form;
pub mod service;

pub use form::MailForm;
pub use service::{MailRequestService, MailSubmission};
