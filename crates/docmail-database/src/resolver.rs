//! Resolution of `(TargetKind, id)` pairs into entities.

use std::sync::Arc;

use tracing::debug;

use docmail_core::result::AppResult;
use docmail_core::types::{
    DocumentFileId, DocumentId, DocumentVersionId, TargetKind,
};
use docmail_entity::document::{Document, TargetEntity};

use crate::store::EntityStore;

/// Loads target entities for a kind, hiding those whose document is in the
/// trash.
#[derive(Debug, Clone)]
pub struct EntityResolver {
    store: Arc<dyn EntityStore>,
}

impl EntityResolver {
    /// Create a resolver over an entity store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Resolve an addressable entity, or `None` when it does not exist or
    /// its document is trashed.
    pub async fn resolve_valid(&self, kind: TargetKind, id: i64) -> AppResult<Option<TargetEntity>> {
        let entity = match kind {
            TargetKind::Document => {
                let Some(document) = self.valid_document(DocumentId(id)).await? else {
                    return Ok(None);
                };
                TargetEntity::Document { document }
            }
            TargetKind::DocumentFile => {
                let Some(file) = self.store.find_document_file(DocumentFileId(id)).await? else {
                    return Ok(None);
                };
                let Some(document) = self.valid_document(file.document_id).await? else {
                    return Ok(None);
                };
                TargetEntity::DocumentFile { file, document }
            }
            TargetKind::DocumentVersion => {
                let Some(version) = self
                    .store
                    .find_document_version(DocumentVersionId(id))
                    .await?
                else {
                    return Ok(None);
                };
                let Some(document) = self.valid_document(version.document_id).await? else {
                    return Ok(None);
                };
                TargetEntity::DocumentVersion { version, document }
            }
        };

        Ok(Some(entity))
    }

    async fn valid_document(&self, id: DocumentId) -> AppResult<Option<Document>> {
        let document = self.store.find_document(id).await?;
        match document {
            Some(doc) if doc.is_valid() => Ok(Some(doc)),
            Some(_) => {
                debug!(document_id = %id, "Document is trashed");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEntityStore;

    fn setup() -> (Arc<MemoryEntityStore>, EntityResolver) {
        let store = Arc::new(MemoryEntityStore::new());
        let resolver = EntityResolver::new(store.clone());
        (store, resolver)
    }

    #[tokio::test]
    async fn test_resolves_file_with_document() {
        let (store, resolver) = setup();
        let doc = store.add_document("Contract");
        let file = store.add_file(doc.id, "contract.pdf", "contract.pdf");

        let entity = resolver
            .resolve_valid(TargetKind::DocumentFile, file.id.get())
            .await
            .expect("lookup")
            .expect("found");
        assert_eq!(entity.document().id, doc.id);
        assert_eq!(entity.kind(), TargetKind::DocumentFile);
    }

    #[tokio::test]
    async fn test_trashed_document_hides_children() {
        let (store, resolver) = setup();
        let doc = store.add_document("Old");
        let file = store.add_file(doc.id, "old.txt", "old.txt");
        let version = store.add_version(doc.id, None);
        store.trash_document(doc.id);

        for (kind, id) in [
            (TargetKind::Document, doc.id.get()),
            (TargetKind::DocumentFile, file.id.get()),
            (TargetKind::DocumentVersion, version.id.get()),
        ] {
            assert!(
                resolver.resolve_valid(kind, id).await.expect("lookup").is_none(),
                "{kind} should be hidden"
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let (_, resolver) = setup();
        assert!(
            resolver
                .resolve_valid(TargetKind::DocumentVersion, 99)
                .await
                .expect("lookup")
                .is_none()
        );
    }
}
