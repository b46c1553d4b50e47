//! In-memory share grant store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::types::ShareId;
use docshare_entity::share::{NewShareGrant, ShareGrant};

use crate::store::ShareStore;

#[derive(Debug, Default)]
struct InnerState {
    grants: HashMap<ShareId, ShareGrant>,
    /// (document_id, recipient email) -> grant ids.
    by_recipient: HashMap<(String, String), Vec<ShareId>>,
    /// Slugs held by active grants.
    active_slugs: HashMap<String, ShareId>,
}

/// Share store with a recipient index and a slug table.
#[derive(Debug, Clone, Default)]
pub struct MemoryShareStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryShareStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a grant's expiry. Returns `false` if the grant is unknown.
    pub async fn set_expires_at(&self, id: ShareId, expires_at: Option<DateTime<Utc>>) -> bool {
        let mut state = self.state.write().await;
        match state.grants.get_mut(&id) {
            Some(grant) => {
                grant.expires_at = expires_at;
                true
            }
            None => false,
        }
    }

    /// Number of stored grants, active or not.
    pub async fn len(&self) -> usize {
        self.state.read().await.grants.len()
    }

    /// Whether the store holds no grants.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn recipient_key(document_id: &str, email: &str) -> (String, String) {
    (document_id.to_string(), email.to_lowercase())
}

fn newest_first(grants: &mut [ShareGrant]) {
    grants.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn insert(&self, data: NewShareGrant) -> AppResult<ShareGrant> {
        let grant = data.into_grant(Utc::now());
        let mut state = self.state.write().await;

        if let Some(slug) = &grant.custom_slug {
            if state.active_slugs.contains_key(slug) {
                return Err(AppError::conflict("Custom slug is already in use"));
            }
            state.active_slugs.insert(slug.clone(), grant.id);
        }

        state
            .by_recipient
            .entry(recipient_key(&grant.document_id, &grant.shared_with_email))
            .or_default()
            .push(grant.id);
        state.grants.insert(grant.id, grant.clone());

        debug!(share_id = %grant.id, "Grant stored");
        Ok(grant)
    }

    async fn find_by_id(&self, id: ShareId) -> AppResult<Option<ShareGrant>> {
        Ok(self.state.read().await.grants.get(&id).cloned())
    }

    async fn find_active_by_slug(&self, slug: &str) -> AppResult<Option<ShareGrant>> {
        let state = self.state.read().await;
        Ok(state
            .active_slugs
            .get(slug)
            .and_then(|id| state.grants.get(id))
            .cloned())
    }

    async fn find_active_for_recipient(
        &self,
        document_id: &str,
        email: &str,
    ) -> AppResult<Vec<ShareGrant>> {
        let state = self.state.read().await;
        let mut grants: Vec<ShareGrant> = state
            .by_recipient
            .get(&recipient_key(document_id, email))
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.grants.get(id))
                    .filter(|g| g.is_active)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        newest_first(&mut grants);
        Ok(grants)
    }

    async fn list_by_owner(&self, email: &str) -> AppResult<Vec<ShareGrant>> {
        let state = self.state.read().await;
        let mut grants: Vec<ShareGrant> = state
            .grants
            .values()
            .filter(|g| g.shared_by.eq_ignore_ascii_case(email))
            .cloned()
            .collect();
        newest_first(&mut grants);
        Ok(grants)
    }

    async fn list_by_recipient(&self, email: &str) -> AppResult<Vec<ShareGrant>> {
        let state = self.state.read().await;
        let mut grants: Vec<ShareGrant> = state
            .grants
            .values()
            .filter(|g| g.is_active && g.shared_with_email.eq_ignore_ascii_case(email))
            .cloned()
            .collect();
        newest_first(&mut grants);
        Ok(grants)
    }

    async fn revoke(&self, id: ShareId, revoked_by: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let slug = match state.grants.get_mut(&id) {
            Some(grant) if grant.is_active => {
                grant.is_active = false;
                grant.revoked_at = Some(now);
                grant.revoked_by = Some(revoked_by.to_string());
                grant.custom_slug.clone()
            }
            _ => return Ok(false),
        };
        if let Some(slug) = slug {
            state.active_slugs.remove(&slug);
        }
        Ok(true)
    }

    async fn delete(&self, id: ShareId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let Some(grant) = state.grants.remove(&id) else {
            return Ok(false);
        };

        let key = recipient_key(&grant.document_id, &grant.shared_with_email);
        if let Some(ids) = state.by_recipient.get_mut(&key) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                state.by_recipient.remove(&key);
            }
        }
        if let Some(slug) = &grant.custom_slug {
            if state.active_slugs.get(slug) == Some(&id) {
                state.active_slugs.remove(slug);
            }
        }
        Ok(true)
    }

    async fn touch(
        &self,
        id: ShareId,
        count: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareGrant>> {
        let mut state = self.state.write().await;
        Ok(state.grants.get_mut(&id).map(|grant| {
            grant.last_accessed_at = Some(now);
            if count {
                grant.download_count += 1;
            }
            grant.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docshare_core::error::ErrorKind;
    use docshare_entity::share::AccessLevel;

    fn new_grant(email: &str, slug: Option<&str>) -> NewShareGrant {
        NewShareGrant {
            document_id: "doc-1".to_string(),
            shared_by: "owner@example.com".to_string(),
            shared_with_email: email.to_string(),
            access_level: AccessLevel::View,
            expires_at: None,
            password_hash: None,
            custom_slug: slug.map(String::from),
            source_app: "fintutto".to_string(),
            shared_with_app: None,
            track_downloads: false,
        }
    }

    #[tokio::test]
    async fn test_slug_conflict_and_reuse_after_revoke() {
        let store = MemoryShareStore::new();
        let first = store
            .insert(new_grant("a@example.com", Some("lease-2024")))
            .await
            .unwrap();

        let err = store
            .insert(new_grant("b@example.com", Some("lease-2024")))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        assert!(store.revoke(first.id, "owner@example.com", Utc::now()).await.unwrap());
        assert!(store
            .insert(new_grant("b@example.com", Some("lease-2024")))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_revoke_only_changes_active_grants() {
        let store = MemoryShareStore::new();
        let grant = store.insert(new_grant("a@example.com", None)).await.unwrap();

        assert!(store.revoke(grant.id, "owner@example.com", Utc::now()).await.unwrap());
        assert!(!store.revoke(grant.id, "owner@example.com", Utc::now()).await.unwrap());
        assert!(store
            .find_active_for_recipient("doc-1", "a@example.com")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_recipient_lookup_is_case_insensitive() {
        let store = MemoryShareStore::new();
        store.insert(new_grant("a@example.com", None)).await.unwrap();
        let found = store
            .find_active_for_recipient("doc-1", "A@Example.com")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_frees_indexes() {
        let store = MemoryShareStore::new();
        let grant = store
            .insert(new_grant("a@example.com", Some("tmp-slug")))
            .await
            .unwrap();
        assert!(store.delete(grant.id).await.unwrap());
        assert!(store.is_empty().await);
        assert!(store.find_active_by_slug("tmp-slug").await.unwrap().is_none());
        assert!(!store.delete(grant.id).await.unwrap());
    }
}
