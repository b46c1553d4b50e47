//! JWT claims carried by bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{Identity, Role};

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the caller's email.
    pub sub: String,
    /// Role at issuance.
    #[serde(default)]
    pub role: Role,
    /// App the token was issued for; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Resolve the caller, falling back to `default_app`.
    pub fn into_identity(self, default_app: &str) -> Identity {
        let app = self
            .app
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| default_app.to_string());
        Identity::new(&self.sub, self.role, app)
    }
}
