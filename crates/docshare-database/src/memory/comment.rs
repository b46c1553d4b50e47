//! In-memory comment store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use docshare_core::result::AppResult;
use docshare_core::types::CommentId;
use docshare_entity::comment::{CommentStatus, NewShareComment, ShareComment};

use crate::store::CommentStore;

/// Comments keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryCommentStore {
    comments: Arc<RwLock<HashMap<CommentId, ShareComment>>>,
}

impl MemoryCommentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn insert(&self, data: NewShareComment) -> AppResult<ShareComment> {
        let comment = data.into_comment(Utc::now());
        self.comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: CommentId) -> AppResult<Option<ShareComment>> {
        Ok(self.comments.read().await.get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: CommentId,
        status: CommentStatus,
        decided_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareComment>> {
        let mut comments = self.comments.write().await;
        Ok(comments.get_mut(&id).map(|c| {
            c.status = status;
            c.decided_by = Some(decided_by.to_string());
            c.decided_at = Some(now);
            c.clone()
        }))
    }
}
