//! Core traits defined in `docmail-core` and implemented by other crates.

pub mod storage;

pub use storage::StorageProvider;
