//! # docmail-service
//!
//! The mail request controller. It validates the submitted form, resolves
//! the addressable targets, filters them through the access gate and
//! enqueues one mail job per remaining target.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod mail;

pub use context::RequestContext;
pub use mail::{MailForm, MailRequestService, MailSubmission};
