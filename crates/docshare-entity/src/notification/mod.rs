//! Notification entities.

pub mod channel;
pub mod model;

pub use channel::ChannelKind;
pub use model::{NewNotification, Notification, NotificationEvent};
