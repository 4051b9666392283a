//! Storage provider trait for reading document content.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for document content storage backends.
///
/// Mail jobs only ever read content, so the trait is limited to lookups.
/// The local filesystem implementation lives in `docmail-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read a file into memory as a complete byte vector.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Check whether a file exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Size of the file at the given path, in bytes.
    async fn size(&self, path: &str) -> AppResult<u64>;
}
