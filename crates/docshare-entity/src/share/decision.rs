//! Access evaluation outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::access::AccessLevel;

/// Why an access check resolved the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    /// Requester owns the document.
    Owner,
    /// A valid grant matched.
    Shared,
    /// Every matching grant has expired.
    ShareExpired,
    /// Grants exist but none are pinned to the consuming app.
    AppNotAuthorized,
    /// No grant exists for the requester.
    NotShared,
}

impl AccessReason {
    /// Return the reason as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Shared => "shared",
            Self::ShareExpired => "share_expired",
            Self::AppNotAuthorized => "app_not_authorized",
            Self::NotShared => "not_shared",
        }
    }
}

/// Result of evaluating one identity against one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether access is allowed.
    pub has_access: bool,
    /// `"owner"` or the granted level; absent when denied.
    pub access_level: Option<String>,
    /// Resolution reason.
    pub reason: AccessReason,
    /// Expiry of the winning grant (cross-app checks only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessDecision {
    /// Owner access.
    pub fn owner() -> Self {
        Self {
            has_access: true,
            access_level: Some("owner".to_string()),
            reason: AccessReason::Owner,
            expires_at: None,
        }
    }

    /// Access through a grant.
    pub fn shared(level: AccessLevel, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            has_access: true,
            access_level: Some(level.as_str().to_string()),
            reason: AccessReason::Shared,
            expires_at,
        }
    }

    /// Denied access.
    pub fn denied(reason: AccessReason) -> Self {
        Self {
            has_access: false,
            access_level: None,
            reason,
            expires_at: None,
        }
    }

    /// The effective grant level, if the decision came from a grant.
    ///
    /// Owners implicitly hold every level.
    pub fn effective_level(&self) -> Option<AccessLevel> {
        match self.reason {
            AccessReason::Owner => Some(AccessLevel::Edit),
            AccessReason::Shared => self.access_level.as_deref()?.parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_serializes_without_expiry() {
        let json = serde_json::to_value(AccessDecision::denied(AccessReason::AppNotAuthorized))
            .expect("serialize");
        assert_eq!(json["reason"], "app_not_authorized");
        assert_eq!(json["has_access"], false);
        assert!(json.get("expires_at").is_none());
    }

    #[test]
    fn test_effective_level() {
        assert_eq!(AccessDecision::owner().effective_level(), Some(AccessLevel::Edit));
        assert_eq!(
            AccessDecision::shared(AccessLevel::Download, None).effective_level(),
            Some(AccessLevel::Download)
        );
        assert_eq!(
            AccessDecision::denied(AccessReason::NotShared).effective_level(),
            None
        );
    }
}
