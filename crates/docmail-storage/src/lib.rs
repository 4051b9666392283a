//! # docmail-storage
//!
//! Read-side storage providers for document content: the local filesystem
//! and an in-memory map used in tests.

pub mod providers;

pub use providers::{LocalStorageProvider, MemoryStorageProvider};
