//! Access control entities.

pub mod model;
pub mod permission;

pub use model::{AclEntry, CreateAclEntry};
pub use permission::Permission;
