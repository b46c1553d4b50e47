//! In-memory notification inbox.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use docshare_core::result::AppResult;
use docshare_entity::notification::{NewNotification, Notification};

use crate::store::NotificationStore;

/// Notifications in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotificationStore {
    items: Arc<RwLock<Vec<Notification>>>,
}

impl MemoryNotificationStore {
    /// Create an empty inbox.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, data: NewNotification) -> AppResult<Notification> {
        let n = data.into_notification(Utc::now());
        self.items.write().await.push(n.clone());
        Ok(n)
    }

    async fn list_for_user(&self, email: &str) -> AppResult<Vec<Notification>> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .rev()
            .filter(|n| n.user_email.eq_ignore_ascii_case(email))
            .cloned()
            .collect())
    }
}
