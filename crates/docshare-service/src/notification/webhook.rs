//! Webhook channel: POSTs the event JSON to a configured URL.

use async_trait::async_trait;

use docshare_core::config::notification::WebhookChannelConfig;
use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_entity::notification::{ChannelKind, NotificationEvent};

use super::channel::NotificationChannel;

/// Forwards events to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct WebhookChannel {
    client: reqwest::Client,
    config: WebhookChannelConfig,
}

impl WebhookChannel {
    /// Creates a new webhook channel sharing `client`.
    pub fn new(client: reqwest::Client, config: WebhookChannelConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Webhook
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.url.is_empty()
    }

    async fn deliver(&self, event: &NotificationEvent) -> AppResult<()> {
        let response = self
            .client
            .post(&self.config.url)
            .json(event)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Webhook request failed", e)
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::external(format!(
                "Webhook responded with status {}",
                response.status().as_u16()
            )))
        }
    }
}
