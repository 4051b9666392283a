//! In-memory store implementations.
//!
//! Backed by `DashMap`s and used by tests and by the single-process
//! development mode. Ids are assigned from per-store sequences.

pub mod acl;
pub mod audit;
pub mod entity;
pub mod mailer;

pub use acl::MemoryAclStore;
pub use audit::MemoryAuditStore;
pub use entity::MemoryEntityStore;
pub use mailer::MemoryMailerStore;
