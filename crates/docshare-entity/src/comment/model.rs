//! Comment left on a shared document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docshare_core::types::CommentId;

/// Moderation state of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "comment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    /// Awaiting the owner's decision.
    Pending,
    /// Visible.
    Approved,
    /// Hidden by the owner.
    Rejected,
}

/// A recipient's comment on a shared document, moderated by the owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareComment {
    /// Unique comment identifier.
    pub id: CommentId,
    /// Commented document.
    pub document_id: String,
    /// Author email.
    pub author_email: String,
    /// Comment text.
    pub body: String,
    /// Moderation state.
    pub status: CommentStatus,
    /// When the comment was posted.
    pub created_at: DateTime<Utc>,
    /// Owner who moderated.
    pub decided_by: Option<String>,
    /// When it was moderated.
    pub decided_at: Option<DateTime<Utc>>,
}

/// Data required to post a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShareComment {
    /// Commented document.
    pub document_id: String,
    /// Author email.
    pub author_email: String,
    /// Comment text.
    pub body: String,
}

impl NewShareComment {
    /// Materialize a pending comment at `now`.
    pub fn into_comment(self, now: DateTime<Utc>) -> ShareComment {
        ShareComment {
            id: CommentId::new(),
            document_id: self.document_id,
            author_email: self.author_email,
            body: self.body,
            status: CommentStatus::Pending,
            created_at: now,
            decided_by: None,
            decided_at: None,
        }
    }
}
