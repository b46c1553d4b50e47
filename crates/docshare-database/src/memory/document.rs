//! In-memory document catalogue.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use docshare_core::result::AppResult;
use docshare_entity::document::DocumentRecord;

use crate::store::DocumentCatalog;

/// Document catalogue held in a map keyed by document id.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentCatalog {
    documents: Arc<RwLock<HashMap<String, DocumentRecord>>>,
}

impl MemoryDocumentCatalog {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentCatalog for MemoryDocumentCatalog {
    async fn find_document(&self, document_id: &str) -> AppResult<Option<DocumentRecord>> {
        Ok(self.documents.read().await.get(document_id).cloned())
    }

    async fn upsert_document(&self, document: &DocumentRecord) -> AppResult<()> {
        self.documents
            .write()
            .await
            .insert(document.id.clone(), document.clone());
        Ok(())
    }
}
