//! Grant selection.
//!
//! Precedence after the owner check: a valid grant wins, then expiry,
//! then app mismatch, then "not shared". Among valid grants an app-pinned
//! grant beats a wildcard one, then the more permissive level, then the
//! newer grant.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use docshare_entity::share::{AccessDecision, AccessReason, ShareGrant};

/// Decide access from the active grants of one requester on one document.
///
/// `target_app` is set for cross-app checks only; same-app checks ignore
/// `shared_with_app`.
pub fn evaluate_grants(
    candidates: &[ShareGrant],
    now: DateTime<Utc>,
    target_app: Option<&str>,
) -> AccessDecision {
    if candidates.is_empty() {
        return AccessDecision::denied(AccessReason::NotShared);
    }

    let unexpired: Vec<&ShareGrant> = candidates
        .iter()
        .filter(|g| g.is_active && !g.is_expired_at(now))
        .collect();
    let any_expired = unexpired.len() < candidates.len();

    let best = unexpired
        .iter()
        .filter(|g| target_app.is_none_or(|app| g.allows_app(app)))
        .max_by(|a, b| specificity(a, b, target_app.is_some()));

    match best {
        Some(grant) => {
            let expires_at = if target_app.is_some() {
                grant.expires_at
            } else {
                None
            };
            AccessDecision::shared(grant.access_level, expires_at)
        }
        None if any_expired => AccessDecision::denied(AccessReason::ShareExpired),
        None => AccessDecision::denied(AccessReason::AppNotAuthorized),
    }
}

fn specificity(a: &ShareGrant, b: &ShareGrant, cross_app: bool) -> Ordering {
    let pinned = |g: &ShareGrant| cross_app && g.shared_with_app.is_some();
    pinned(a)
        .cmp(&pinned(b))
        .then_with(|| a.access_level.rank().cmp(&b.access_level.rank()))
        .then_with(|| a.created_at.cmp(&b.created_at))
}
