//! The mailing access gate and its ACL-backed implementation.

pub mod checker;
pub mod gate;

pub use checker::AclChecker;
pub use gate::{AccessGate, AccessTarget};
