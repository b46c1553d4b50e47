//! In-app channel: persists a notification row.

use std::sync::Arc;

use async_trait::async_trait;

use docshare_core::result::AppResult;
use docshare_database::NotificationStore;
use docshare_entity::notification::{ChannelKind, NewNotification, NotificationEvent};

use super::channel::NotificationChannel;

/// Writes notifications to the inbox store.
#[derive(Clone)]
pub struct InAppChannel {
    store: Arc<dyn NotificationStore>,
}

impl InAppChannel {
    /// Creates a new in-app channel.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationChannel for InAppChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::InApp
    }

    async fn deliver(&self, event: &NotificationEvent) -> AppResult<()> {
        self.store.insert(NewNotification::from(event)).await?;
        Ok(())
    }
}
