//! Core type definitions used across the DocMail workspace.

pub mod id;
pub mod response;
pub mod target;

pub use id::*;
pub use response::ApiErrorResponse;
pub use target::{DeliveryMode, TargetKind};
