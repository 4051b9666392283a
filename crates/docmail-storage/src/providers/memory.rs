//! In-memory storage provider.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use docmail_core::error::AppError;
use docmail_core::result::AppResult;
use docmail_core::traits::storage::StorageProvider;

/// Storage provider keeping content in a map.
#[derive(Debug, Default)]
pub struct MemoryStorageProvider {
    objects: DashMap<String, Bytes>,
}

impl MemoryStorageProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store content at `path`.
    pub fn put(&self, path: &str, data: impl Into<Bytes>) {
        self.objects.insert(path.to_string(), data.into());
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        self.objects
            .get(path)
            .map(|b| b.clone())
            .ok_or_else(|| AppError::not_found(format!("File not found: {path}")))
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(path))
    }

    async fn size(&self, path: &str) -> AppResult<u64> {
        self.read_bytes(path).await.map(|b| b.len() as u64)
    }
}
