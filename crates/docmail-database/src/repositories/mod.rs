//! PostgreSQL repository implementations.

pub mod acl;
pub mod audit;
pub mod document;
pub mod job;
pub mod mailer;

pub use acl::AclRepository;
pub use audit::AuditEventRepository;
pub use document::DocumentRepository;
pub use job::JobRepository;
pub use mailer::UserMailerRepository;
