//! In-app notification repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_entity::notification::{NewNotification, Notification};

use crate::store::NotificationStore;

/// Repository for the `notifications` table.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert(&self, data: NewNotification) -> AppResult<Notification> {
        let n = data.into_notification(Utc::now());
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, user_email, event_type, resource_id, message, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(n.id)
        .bind(&n.user_email)
        .bind(&n.event_type)
        .bind(&n.resource_id)
        .bind(&n.message)
        .bind(n.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })
    }

    async fn list_for_user(&self, email: &str) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_email = $1 ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }
}
