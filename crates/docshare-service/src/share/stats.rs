//! Read-time aggregates over an owner's grants.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use docshare_entity::share::{AccessLevel, GrantStatus, ShareGrant};

/// How many grants are listed under `recently_shared`.
pub const RECENT_LIMIT: usize = 5;

/// Aggregates derived from the grants an owner created.
#[derive(Debug, Clone, Serialize)]
pub struct ShareStats {
    /// All grants, any status.
    pub total_shares: usize,
    /// Active and unexpired.
    pub active_shares: usize,
    /// Active but expired.
    pub expired_shares: usize,
    /// Revoked.
    pub revoked_shares: usize,
    /// Counts per access level, every level present.
    pub by_access_level: BTreeMap<String, usize>,
    /// Distinct recipient emails.
    pub total_recipients: usize,
    /// Most recent grants.
    pub recently_shared: Vec<ShareGrant>,
}

impl ShareStats {
    /// Compute stats from grants already ordered newest first.
    pub fn compute(grants: &[ShareGrant], now: DateTime<Utc>) -> Self {
        let mut by_access_level: BTreeMap<String, usize> = AccessLevel::ALL
            .iter()
            .map(|level| (level.as_str().to_string(), 0))
            .collect();
        let mut recipients = HashSet::new();
        let (mut active, mut expired, mut revoked) = (0, 0, 0);

        for grant in grants {
            match grant.status_at(now) {
                GrantStatus::Active => active += 1,
                GrantStatus::Expired => expired += 1,
                GrantStatus::Revoked => revoked += 1,
            }
            *by_access_level
                .entry(grant.access_level.as_str().to_string())
                .or_default() += 1;
            recipients.insert(grant.shared_with_email.as_str());
        }

        Self {
            total_shares: grants.len(),
            active_shares: active,
            expired_shares: expired,
            revoked_shares: revoked,
            by_access_level,
            total_recipients: recipients.len(),
            recently_shared: grants.iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use docshare_entity::share::NewShareGrant;

    fn grant(email: &str, level: AccessLevel) -> ShareGrant {
        NewShareGrant {
            document_id: "doc-1".into(),
            shared_by: "owner@example.com".into(),
            shared_with_email: email.into(),
            access_level: level,
            expires_at: None,
            password_hash: None,
            custom_slug: None,
            source_app: "fintutto".into(),
            shared_with_app: None,
            track_downloads: false,
        }
        .into_grant(Utc::now())
    }

    #[test]
    fn test_compute() {
        let now = Utc::now();
        let mut grants: Vec<ShareGrant> = (0..6)
            .map(|i| grant(&format!("r{}@example.com", i % 4), AccessLevel::View))
            .collect();
        grants[0].access_level = AccessLevel::Edit;
        grants[1].expires_at = Some(now - Duration::hours(1));
        grants[2].is_active = false;

        let stats = ShareStats::compute(&grants, now);
        assert_eq!(stats.total_shares, 6);
        assert_eq!(stats.active_shares, 4);
        assert_eq!(stats.expired_shares, 1);
        assert_eq!(stats.revoked_shares, 1);
        assert_eq!(stats.by_access_level["view"], 5);
        assert_eq!(stats.by_access_level["edit"], 1);
        assert_eq!(stats.by_access_level["download"], 0);
        assert_eq!(stats.total_recipients, 4);
        assert_eq!(stats.recently_shared.len(), RECENT_LIMIT);
    }
}
