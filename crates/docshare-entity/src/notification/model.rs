//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docshare_core::types::NotificationId;

/// A persisted in-app notification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Recipient email.
    pub user_email: String,
    /// Event type that triggered this notification.
    pub event_type: String,
    /// Resource the event concerns.
    pub resource_id: String,
    /// Notification body text.
    pub message: String,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to persist an in-app notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// Recipient email.
    pub user_email: String,
    /// Event type.
    pub event_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Body text.
    pub message: String,
}

impl NewNotification {
    /// Materialize the row at `now`.
    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_email: self.user_email,
            event_type: self.event_type,
            resource_id: self.resource_id,
            message: self.message,
            created_at: now,
        }
    }
}

/// An event handed to the dispatcher; serialized as the webhook body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Recipient email.
    pub user_email: String,
    /// Event type, e.g. `"share.created"`.
    pub event_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Human-readable message.
    pub message: String,
}

impl NotificationEvent {
    /// Build an event.
    pub fn new(
        user_email: impl Into<String>,
        event_type: impl Into<String>,
        resource_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            event_type: event_type.into(),
            resource_id: resource_id.into(),
            message: message.into(),
        }
    }
}

impl From<&NotificationEvent> for NewNotification {
    fn from(event: &NotificationEvent) -> Self {
        Self {
            user_email: event.user_email.clone(),
            event_type: event.event_type.clone(),
            resource_id: event.resource_id.clone(),
            message: event.message.clone(),
        }
    }
}
