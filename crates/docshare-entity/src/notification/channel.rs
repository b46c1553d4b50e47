//! Delivery channel names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A notification delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// HTTP mail API.
    Email,
    /// HTTP POST of the event.
    Webhook,
    /// Persisted notification row.
    InApp,
}

impl ChannelKind {
    /// Return the channel as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Webhook => "webhook",
            Self::InApp => "in_app",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = docshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "webhook" => Ok(Self::Webhook),
            "in_app" | "in-app" => Ok(Self::InApp),
            other => Err(docshare_core::AppError::validation(format!(
                "Unknown notification channel: '{other}'"
            ))),
        }
    }
}
