//! # docmail-entity
//!
//! Domain entity models for DocMail. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod audit;
pub mod document;
pub mod job;
pub mod mailer;
pub mod permission;
