//! Comment creation and moderation.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use docshare_core::error::AppError;
use docshare_core::types::CommentId;
use docshare_database::{CommentStore, DocumentCatalog};
use docshare_entity::audit::action;
use docshare_entity::comment::{CommentStatus, NewShareComment, ShareComment};
use docshare_entity::notification::NotificationEvent;

use crate::access::AccessService;
use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::notification::NotificationDispatcher;
use crate::validation::require_non_empty;

/// Longest accepted comment body, in characters.
pub const MAX_COMMENT_LEN: usize = 5000;

/// Comments left by anyone with access; visible once the owner approves.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    documents: Arc<dyn DocumentCatalog>,
    access: Arc<AccessService>,
    audit: Arc<AuditService>,
    notifier: Arc<NotificationDispatcher>,
}

impl std::fmt::Debug for CommentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentService").finish_non_exhaustive()
    }
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(
        comments: Arc<dyn CommentStore>,
        documents: Arc<dyn DocumentCatalog>,
        access: Arc<AccessService>,
        audit: Arc<AuditService>,
        notifier: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            comments,
            documents,
            access,
            audit,
            notifier,
        }
    }

    /// Leave a pending comment on a document the caller can access.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        document_id: &str,
        body: &str,
    ) -> Result<ShareComment, AppError> {
        let body = require_non_empty("body", body)?;
        if body.chars().count() > MAX_COMMENT_LEN {
            return Err(AppError::validation(format!(
                "body must be at most {MAX_COMMENT_LEN} characters"
            )));
        }

        let document = self
            .documents
            .find_document(document_id.trim())
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;

        let decision = self.access.check(ctx, &document.id).await?;
        if !decision.has_access {
            return Err(AppError::authorization(format!(
                "Access denied: {}",
                decision.reason.as_str()
            )));
        }

        let comment = self
            .comments
            .insert(NewShareComment {
                document_id: document.id.clone(),
                author_email: ctx.email().to_string(),
                body,
            })
            .await?;

        info!(comment_id = %comment.id, document_id = %comment.document_id, "Comment created");

        self.audit
            .success(
                ctx,
                action::COMMENT_CREATED,
                action::RESOURCE_COMMENT,
                &comment.id.to_string(),
                json!({ "document_id": comment.document_id }),
            )
            .await;

        if !document.is_owned_by(ctx.email()) {
            self.notifier
                .dispatch(NotificationEvent::new(
                    document.owner_email.clone(),
                    action::COMMENT_CREATED,
                    comment.id.to_string(),
                    format!("{} commented on \"{}\"", ctx.email(), document.title),
                ));
        }

        Ok(comment)
    }

    /// Approve or reject a comment. Document owner only.
    pub async fn moderate(
        &self,
        ctx: &RequestContext,
        comment_id: CommentId,
        approved: bool,
    ) -> Result<ShareComment, AppError> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))?;

        let is_owner = self
            .documents
            .find_document(&comment.document_id)
            .await?
            .is_some_and(|doc| doc.is_owned_by(ctx.email()));
        if !is_owner {
            return Err(AppError::authorization(
                "Only the document owner can moderate comments",
            ));
        }

        let status = if approved {
            CommentStatus::Approved
        } else {
            CommentStatus::Rejected
        };
        let updated = self
            .comments
            .set_status(comment_id, status, ctx.email(), ctx.request_time)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))?;

        self.audit
            .success(
                ctx,
                action::COMMENT_MODERATED,
                action::RESOURCE_COMMENT,
                &comment_id.to_string(),
                json!({
                    "status": { "from": comment.status, "to": updated.status },
                }),
            )
            .await;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docshare_core::error::ErrorKind;
    use docshare_entity::share::AccessLevel;

    use crate::share::{CreateShareRequest, ShareOptions};
    use crate::testing::{Fixture, OWNER, TENANT, ctx};

    async fn share_with_tenant(fx: &Fixture) {
        fx.shares
            .create_share(
                &ctx(OWNER),
                CreateShareRequest {
                    document_id: "doc-1".into(),
                    shared_with_email: TENANT.into(),
                    access_level: AccessLevel::View,
                    options: ShareOptions::default(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_comment_requires_access() {
        let fx = Fixture::new().await;
        let err = fx
            .comments
            .create(&ctx(TENANT), "doc-1", "Looks good")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        share_with_tenant(&fx).await;
        let comment = fx
            .comments
            .create(&ctx(TENANT), "doc-1", "  Looks good ")
            .await
            .unwrap();
        assert_eq!(comment.body, "Looks good");
        assert_eq!(comment.status, CommentStatus::Pending);
        assert_eq!(fx.inbox(OWNER).await.len(), 1);
    }

    #[tokio::test]
    async fn test_comment_body_limits() {
        let fx = Fixture::new().await;
        let blank = fx.comments.create(&ctx(OWNER), "doc-1", "  ").await.unwrap_err();
        assert_eq!(blank.kind, ErrorKind::Validation);

        let long = "x".repeat(MAX_COMMENT_LEN + 1);
        let too_long = fx.comments.create(&ctx(OWNER), "doc-1", &long).await.unwrap_err();
        assert_eq!(too_long.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_only_owner_moderates() {
        let fx = Fixture::new().await;
        share_with_tenant(&fx).await;
        let comment = fx
            .comments
            .create(&ctx(TENANT), "doc-1", "Please check page 2")
            .await
            .unwrap();

        let err = fx
            .comments
            .moderate(&ctx(TENANT), comment.id, true)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let approved = fx.comments.moderate(&ctx(OWNER), comment.id, true).await.unwrap();
        assert_eq!(approved.status, CommentStatus::Approved);
        assert_eq!(approved.decided_by.as_deref(), Some(OWNER));
        assert!(
            fx.audit_actions()
                .await
                .contains(&action::COMMENT_MODERATED.to_string())
        );
    }
}
