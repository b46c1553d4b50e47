//! Share comment repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::CommentId;
use docshare_entity::comment::{CommentStatus, NewShareComment, ShareComment};

use crate::store::CommentStore;

/// Repository for the `share_comments` table.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn insert(&self, data: NewShareComment) -> AppResult<ShareComment> {
        let comment = data.into_comment(Utc::now());
        sqlx::query_as::<_, ShareComment>(
            "INSERT INTO share_comments (id, document_id, author_email, body, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(comment.id)
        .bind(&comment.document_id)
        .bind(&comment.author_email)
        .bind(&comment.body)
        .bind(comment.status)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create comment", e))
    }

    async fn find_by_id(&self, id: CommentId) -> AppResult<Option<ShareComment>> {
        sqlx::query_as::<_, ShareComment>("SELECT * FROM share_comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find comment", e))
    }

    async fn set_status(
        &self,
        id: CommentId,
        status: CommentStatus,
        decided_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareComment>> {
        sqlx::query_as::<_, ShareComment>(
            "UPDATE share_comments SET status = $2, decided_by = $3, decided_at = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(decided_by)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to moderate comment", e))
    }
}
