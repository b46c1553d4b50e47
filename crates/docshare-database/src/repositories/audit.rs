//! Audit log repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_entity::audit::{AuditLogEntry, NewAuditLogEntry};

use crate::store::AuditStore;

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn insert(&self, data: NewAuditLogEntry) -> AppResult<AuditLogEntry> {
        let entry = data.into_entry(Utc::now());
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_log (id, actor_email, action, resource_type, resource_id, changes, \
             ip_address, user_agent, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(entry.id)
        .bind(&entry.actor_email)
        .bind(&entry.action)
        .bind(&entry.resource_type)
        .bind(&entry.resource_id)
        .bind(&entry.changes)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.status)
        .bind(entry.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create audit entry", e))
    }

    async fn list_for_resource(&self, resource_id: &str) -> AppResult<Vec<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_log WHERE resource_id = $1 ORDER BY created_at DESC",
        )
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e))
    }
}
