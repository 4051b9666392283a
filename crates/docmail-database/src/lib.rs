//! # docmail-database
//!
//! Store traits for the entities DocMail reads and writes, their PostgreSQL
//! repository implementations, in-memory implementations for tests and
//! local development, and the entity resolver shared by the controller and
//! the mail tasks.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod resolver;
pub mod store;

pub use connection::DatabasePool;
pub use resolver::EntityResolver;
pub use store::{AclStore, AuditStore, EntityStore, MailerStore};
