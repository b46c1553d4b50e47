//! Share grant repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::ShareId;
use docshare_entity::share::{NewShareGrant, ShareGrant};

use super::map_db_error;
use crate::store::ShareStore;

/// Repository for the `share_grants` table.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn insert(&self, data: NewShareGrant) -> AppResult<ShareGrant> {
        let grant = data.into_grant(Utc::now());
        sqlx::query_as::<_, ShareGrant>(
            "INSERT INTO share_grants (id, document_id, shared_by, shared_with_email, access_level, \
             created_at, expires_at, is_active, password_hash, custom_slug, source_app, \
             shared_with_app, track_downloads, download_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, $9, $10, $11, $12, 0) RETURNING *",
        )
        .bind(grant.id)
        .bind(&grant.document_id)
        .bind(&grant.shared_by)
        .bind(&grant.shared_with_email)
        .bind(grant.access_level)
        .bind(grant.created_at)
        .bind(grant.expires_at)
        .bind(&grant.password_hash)
        .bind(&grant.custom_slug)
        .bind(&grant.source_app)
        .bind(&grant.shared_with_app)
        .bind(grant.track_downloads)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error(
            "Failed to create share",
            "Custom slug is already in use",
        ))
    }

    async fn find_by_id(&self, id: ShareId) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>("SELECT * FROM share_grants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    async fn find_active_by_slug(&self, slug: &str) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>(
            "SELECT * FROM share_grants WHERE custom_slug = $1 AND is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share by slug", e))
    }

    async fn find_active_for_recipient(
        &self,
        document_id: &str,
        email: &str,
    ) -> AppResult<Vec<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>(
            "SELECT * FROM share_grants \
             WHERE document_id = $1 AND lower(shared_with_email) = lower($2) AND is_active = TRUE \
             ORDER BY created_at DESC",
        )
        .bind(document_id)
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find grants for recipient", e)
        })
    }

    async fn list_by_owner(&self, email: &str) -> AppResult<Vec<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>(
            "SELECT * FROM share_grants WHERE lower(shared_by) = lower($1) ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shares", e))
    }

    async fn list_by_recipient(&self, email: &str) -> AppResult<Vec<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>(
            "SELECT * FROM share_grants \
             WHERE lower(shared_with_email) = lower($1) AND is_active = TRUE \
             ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list received shares", e)
        })
    }

    async fn revoke(&self, id: ShareId, revoked_by: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE share_grants SET is_active = FALSE, revoked_at = $2, revoked_by = $3 \
             WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(now)
        .bind(revoked_by)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke share", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ShareId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM share_grants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete share", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn touch(
        &self,
        id: ShareId,
        count: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>(
            "UPDATE share_grants SET last_accessed_at = $2, \
             download_count = download_count + CASE WHEN $3 THEN 1 ELSE 0 END \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(now)
        .bind(count)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record access", e))
    }
}
