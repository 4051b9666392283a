//! Document repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use docmail_core::error::{AppError, ErrorKind};
use docmail_core::result::AppResult;
use docmail_core::types::{DocumentFileId, DocumentId, DocumentVersionId};
use docmail_entity::document::{Document, DocumentFile, DocumentVersion};

use crate::store::EntityStore;

/// Read-only repository over the document tables.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for DocumentRepository {
    async fn find_document(&self, id: DocumentId) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    async fn find_document_file(&self, id: DocumentFileId) -> AppResult<Option<DocumentFile>> {
        sqlx::query_as::<_, DocumentFile>("SELECT * FROM document_files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find document file", e)
            })
    }

    async fn find_document_version(
        &self,
        id: DocumentVersionId,
    ) -> AppResult<Option<DocumentVersion>> {
        sqlx::query_as::<_, DocumentVersion>("SELECT * FROM document_versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find document version", e)
            })
    }
}
