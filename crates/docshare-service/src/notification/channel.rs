//! Delivery channel abstraction.

use async_trait::async_trait;

use docshare_core::result::AppResult;
use docshare_entity::notification::{ChannelKind, NotificationEvent};

/// One way of reaching a user.
///
/// A single call to [`deliver`](NotificationChannel::deliver) is one
/// attempt; timeouts and retries are applied by the dispatcher.
#[async_trait]
pub trait NotificationChannel: Send + Sync + 'static {
    /// Which channel this is.
    fn kind(&self) -> ChannelKind;

    /// Disabled channels are skipped without an attempt.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Deliver one event.
    async fn deliver(&self, event: &NotificationEvent) -> AppResult<()>;
}
