//! # docmail-auth
//!
//! Authentication and authorization for DocMail.
//!
//! ## Modules
//!
//! - `jwt`: verification (and, for tooling and tests, issuance) of the
//!   bearer tokens issued by the document-management application
//! - `acl`: the single access gate every mailing entry point goes through,
//!   with document-to-child permission inheritance

pub mod acl;
pub mod jwt;

pub use acl::{AccessGate, AccessTarget, AclChecker};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
