//! In-memory document store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use docmail_core::result::AppResult;
use docmail_core::types::{DocumentFileId, DocumentId, DocumentVersionId};
use docmail_entity::document::{Document, DocumentFile, DocumentVersion};

use crate::store::EntityStore;

/// Documents, files and versions held in memory.
#[derive(Debug)]
pub struct MemoryEntityStore {
    documents: DashMap<DocumentId, Document>,
    files: DashMap<DocumentFileId, DocumentFile>,
    versions: DashMap<DocumentVersionId, DocumentVersion>,
    sequence: AtomicI64,
}

impl MemoryEntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
            files: DashMap::new(),
            versions: DashMap::new(),
            sequence: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Insert a document.
    pub fn add_document(&self, label: &str) -> Document {
        let document = Document {
            id: DocumentId(self.next_id()),
            label: label.to_string(),
            in_trash: false,
            trashed_at: None,
            created_at: Utc::now(),
        };
        self.documents.insert(document.id, document.clone());
        document
    }

    /// Insert a file belonging to `document_id`.
    pub fn add_file(&self, document_id: DocumentId, filename: &str, storage_path: &str) -> DocumentFile {
        let file = DocumentFile {
            id: DocumentFileId(self.next_id()),
            document_id,
            filename: filename.to_string(),
            mimetype: None,
            storage_path: storage_path.to_string(),
            size: 0,
            timestamp: Utc::now(),
        };
        self.files.insert(file.id, file.clone());
        file
    }

    /// Insert a version belonging to `document_id`.
    pub fn add_version(&self, document_id: DocumentId, storage_path: Option<&str>) -> DocumentVersion {
        let version = DocumentVersion {
            id: DocumentVersionId(self.next_id()),
            document_id,
            comment: None,
            active: true,
            storage_path: storage_path.map(str::to_string),
            timestamp: Utc::now(),
        };
        self.versions.insert(version.id, version.clone());
        version
    }

    /// Move a document to the trash.
    pub fn trash_document(&self, id: DocumentId) {
        if let Some(mut doc) = self.documents.get_mut(&id) {
            doc.in_trash = true;
            doc.trashed_at = Some(Utc::now());
        }
    }

    /// Delete a document with its files and versions.
    pub fn delete_document(&self, id: DocumentId) {
        self.documents.remove(&id);
        self.files.retain(|_, f| f.document_id != id);
        self.versions.retain(|_, v| v.document_id != id);
    }

    /// Delete a single file.
    pub fn delete_file(&self, id: DocumentFileId) {
        self.files.remove(&id);
    }
}

impl Default for MemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn find_document(&self, id: DocumentId) -> AppResult<Option<Document>> {
        Ok(self.documents.get(&id).map(|d| d.clone()))
    }

    async fn find_document_file(&self, id: DocumentFileId) -> AppResult<Option<DocumentFile>> {
        Ok(self.files.get(&id).map(|f| f.clone()))
    }

    async fn find_document_version(
        &self,
        id: DocumentVersionId,
    ) -> AppResult<Option<DocumentVersion>> {
        Ok(self.versions.get(&id).map(|v| v.clone()))
    }
}
