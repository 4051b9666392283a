//! Audit event entities.

pub mod model;

pub use model::{AuditEvent, CreateAuditEvent, ObjectRef, EMAIL_SENT};
