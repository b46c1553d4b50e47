//! Document catalogue repository.

use async_trait::async_trait;
use sqlx::PgPool;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_entity::document::DocumentRecord;

use crate::store::DocumentCatalog;

/// Reads document ownership from the `documents` table.
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
impl DocumentCatalog for DocumentRepository {
    async fn find_document(&self, document_id: &str) -> AppResult<Option<DocumentRecord>> {
        sqlx::query_as::<_, DocumentRecord>("SELECT * FROM documents WHERE id = $1")
            .bind(document_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    async fn upsert_document(&self, document: &DocumentRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO documents (id, owner_email, title, source_app, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET owner_email = EXCLUDED.owner_email, \
             title = EXCLUDED.title, source_app = EXCLUDED.source_app",
        )
        .bind(&document.id)
        .bind(&document.owner_email)
        .bind(&document.title)
        .bind(&document.source_app)
        .bind(document.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert document", e))?;
        Ok(())
    }
}
