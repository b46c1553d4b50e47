//! Email channel: POSTs `{from, to, subject, text}` to a mail API.

use async_trait::async_trait;
use serde::Serialize;

use docshare_core::config::notification::EmailChannelConfig;
use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_entity::notification::{ChannelKind, NotificationEvent};

use super::channel::NotificationChannel;

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    text: &'a str,
}

/// Sends mail through an HTTP mail API.
#[derive(Debug, Clone)]
pub struct EmailChannel {
    client: reqwest::Client,
    config: EmailChannelConfig,
}

impl EmailChannel {
    /// Creates a new email channel sharing `client`.
    pub fn new(client: reqwest::Client, config: EmailChannelConfig) -> Self {
        Self { client, config }
    }
}

fn subject_for(event_type: &str) -> String {
    match event_type {
        "share.created" => "A document was shared with you".to_string(),
        "share.revoked" => "Access to a shared document was revoked".to_string(),
        "approval.requested" => "Your approval is requested".to_string(),
        "approval.completed" => "An approval workflow has completed".to_string(),
        other => format!("FinTuttO notification: {other}"),
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.endpoint.is_empty()
    }

    async fn deliver(&self, event: &NotificationEvent) -> AppResult<()> {
        let body = MailRequest {
            from: &self.config.from,
            to: &event.user_email,
            subject: subject_for(&event.event_type),
            text: &event.message,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Mail API request failed", e)
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AppError::external(format!(
                "Mail API responded with status {}",
                status.as_u16()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_endpoint() {
        let channel = EmailChannel::new(
            reqwest::Client::new(),
            EmailChannelConfig {
                enabled: true,
                ..EmailChannelConfig::default()
            },
        );
        assert!(!channel.is_enabled());
    }

    #[test]
    fn test_subject_mapping() {
        assert_eq!(subject_for("share.created"), "A document was shared with you");
        assert!(subject_for("custom.event").contains("custom.event"));
    }
}
