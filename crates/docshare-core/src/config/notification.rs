//! Notification delivery configuration.

use serde::{Deserialize, Serialize};

/// Outbound notification settings shared by every delivery channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Per-attempt timeout in seconds for outbound HTTP calls.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Retries after the first failed attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff before the first retry, doubled on each further retry.
    #[serde(default = "default_backoff")]
    pub initial_backoff_ms: u64,
    /// Channels used when an event does not name its own.
    #[serde(default = "default_channels")]
    pub default_channels: Vec<String>,
    /// Mail API settings.
    #[serde(default)]
    pub email: EmailChannelConfig,
    /// Webhook settings.
    #[serde(default)]
    pub webhook: WebhookChannelConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_backoff(),
            default_channels: default_channels(),
            email: EmailChannelConfig::default(),
            webhook: WebhookChannelConfig::default(),
        }
    }
}

/// HTTP mail-sending integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailChannelConfig {
    /// Whether email delivery is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Mail API endpoint accepting `{to, subject, text}` JSON.
    #[serde(default)]
    pub endpoint: String,
    /// Bearer key for the mail API.
    #[serde(default)]
    pub api_key: String,
    /// Sender address.
    #[serde(default = "default_sender")]
    pub from: String,
}

impl Default for EmailChannelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_key: String::new(),
            from: default_sender(),
        }
    }
}

/// Event webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookChannelConfig {
    /// Whether webhook delivery is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Target URL receiving the notification JSON.
    #[serde(default)]
    pub url: String,
}

fn default_timeout() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff() -> u64 {
    200
}

fn default_channels() -> Vec<String> {
    vec!["in_app".to_string(), "email".to_string()]
}

fn default_sender() -> String {
    "no-reply@fintutto.de".to_string()
}
