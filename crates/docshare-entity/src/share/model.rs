//! Share grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docshare_core::types::ShareId;

use super::access::AccessLevel;

/// Status of a grant derived from `is_active` and `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantStatus {
    /// Active and not yet expired.
    Active,
    /// Active but past its expiry.
    Expired,
    /// Revoked by the owner or recipient.
    Revoked,
}

impl GrantStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }
}

/// A record authorizing one identity to access one document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareGrant {
    /// Unique grant identifier.
    pub id: ShareId,
    /// Document on the hosted platform.
    pub document_id: String,
    /// Email of the owner who created the grant.
    pub shared_by: String,
    /// Recipient email (lower-cased).
    pub shared_with_email: String,
    /// Capability granted.
    pub access_level: AccessLevel,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
    /// When the grant stops being honoured (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// False once revoked.
    pub is_active: bool,
    /// Argon2id hash of the link password.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Human-chosen public path segment.
    pub custom_slug: Option<String>,
    /// App the grant was created from.
    pub source_app: String,
    /// Restricts which consuming app may honour the grant.
    pub shared_with_app: Option<String>,
    /// Whether downloads are counted.
    pub track_downloads: bool,
    /// Number of recorded downloads.
    pub download_count: i32,
    /// Last download or link open.
    pub last_accessed_at: Option<DateTime<Utc>>,
    /// When the grant was revoked.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Who revoked the grant.
    pub revoked_by: Option<String>,
}

impl ShareGrant {
    /// Whether the grant is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Whether a consuming app may honour this grant.
    pub fn allows_app(&self, app: &str) -> bool {
        self.shared_with_app
            .as_deref()
            .is_none_or(|pinned| pinned.eq_ignore_ascii_case(app))
    }

    /// Cross-app grants are pinned to a consuming app.
    pub fn is_cross_app(&self) -> bool {
        self.shared_with_app.is_some()
    }

    /// Whether the grant is password protected.
    pub fn is_password_protected(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Derive the display status at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> GrantStatus {
        if !self.is_active {
            GrantStatus::Revoked
        } else if self.is_expired_at(now) {
            GrantStatus::Expired
        } else {
            GrantStatus::Active
        }
    }

    /// Public path for slugged grants.
    pub fn share_link(&self) -> Option<String> {
        self.custom_slug.as_deref().map(share_link_for_slug)
    }
}

/// Build the path-style public link for a slug.
pub fn share_link_for_slug(slug: &str) -> String {
    format!("/d/{slug}")
}

/// Data required to create a new share grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShareGrant {
    /// Document being shared.
    pub document_id: String,
    /// Owner email.
    pub shared_by: String,
    /// Recipient email (already normalized).
    pub shared_with_email: String,
    /// Capability.
    pub access_level: AccessLevel,
    /// Expiry (must be after `created_at`).
    pub expires_at: Option<DateTime<Utc>>,
    /// Argon2id hash, never plaintext.
    pub password_hash: Option<String>,
    /// Optional public slug.
    pub custom_slug: Option<String>,
    /// Originating app.
    pub source_app: String,
    /// Consuming-app restriction.
    pub shared_with_app: Option<String>,
    /// Count downloads.
    pub track_downloads: bool,
}

impl NewShareGrant {
    /// Materialize the row with a fresh id at `now`.
    pub fn into_grant(self, now: DateTime<Utc>) -> ShareGrant {
        ShareGrant {
            id: ShareId::new(),
            document_id: self.document_id,
            shared_by: self.shared_by,
            shared_with_email: self.shared_with_email,
            access_level: self.access_level,
            created_at: now,
            expires_at: self.expires_at,
            is_active: true,
            password_hash: self.password_hash,
            custom_slug: self.custom_slug,
            source_app: self.source_app,
            shared_with_app: self.shared_with_app,
            track_downloads: self.track_downloads,
            download_count: 0,
            last_accessed_at: None,
            revoked_at: None,
            revoked_by: None,
        }
    }
}
