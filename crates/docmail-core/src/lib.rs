//! # docmail-core
//!
//! Core crate for DocMail. Contains the configuration schemas, typed
//! identifiers, the storage provider trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DocMail crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
