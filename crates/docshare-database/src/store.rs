//! Store traits implemented by the PostgreSQL repositories and the
//! in-memory stores.
//!
//! Invariants that must survive concurrent requests live here rather than
//! in the services: slug uniqueness among active grants (`insert` reports
//! `Conflict`), at-most-once revocation (`revoke` returns whether it
//! changed anything) and the single pending-to-terminal transition of an
//! approval workflow (`transition` and `approve` return whether they won).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use docshare_core::result::AppResult;
use docshare_core::types::{CommentId, ShareId, WorkflowId};
use docshare_entity::approval::{
    ApprovalStatus, ApprovalWorkflow, ApproverDecision, NewApprovalWorkflow,
};
use docshare_entity::audit::{AuditLogEntry, NewAuditLogEntry};
use docshare_entity::comment::{CommentStatus, NewShareComment, ShareComment};
use docshare_entity::document::DocumentRecord;
use docshare_entity::notification::{NewNotification, Notification};
use docshare_entity::share::{NewShareGrant, ShareGrant};

use crate::memory::{
    MemoryApprovalStore, MemoryAuditStore, MemoryCommentStore, MemoryDocumentCatalog,
    MemoryNotificationStore, MemoryShareStore,
};
use crate::repositories::{
    ApprovalRepository, AuditLogRepository, CommentRepository, DocumentRepository,
    NotificationRepository, ShareRepository,
};

/// Read access to the hosted platform's documents.
#[async_trait]
pub trait DocumentCatalog: Send + Sync + 'static {
    /// Look up a document by its platform key.
    async fn find_document(&self, document_id: &str) -> AppResult<Option<DocumentRecord>>;

    /// Register or refresh a document.
    async fn upsert_document(&self, document: &DocumentRecord) -> AppResult<()>;
}

/// Persistence for share grants.
#[async_trait]
pub trait ShareStore: Send + Sync + 'static {
    /// Insert a grant. A slug held by another active grant yields `Conflict`.
    async fn insert(&self, data: NewShareGrant) -> AppResult<ShareGrant>;

    /// Find a grant by id, active or not.
    async fn find_by_id(&self, id: ShareId) -> AppResult<Option<ShareGrant>>;

    /// Find the active grant holding a slug.
    async fn find_active_by_slug(&self, slug: &str) -> AppResult<Option<ShareGrant>>;

    /// Active grants for one document and recipient (indexed lookup).
    async fn find_active_for_recipient(
        &self,
        document_id: &str,
        email: &str,
    ) -> AppResult<Vec<ShareGrant>>;

    /// Every grant created by `email`, newest first.
    async fn list_by_owner(&self, email: &str) -> AppResult<Vec<ShareGrant>>;

    /// Active grants addressed to `email`, newest first.
    async fn list_by_recipient(&self, email: &str) -> AppResult<Vec<ShareGrant>>;

    /// Deactivate a grant. Returns `false` if it was already inactive.
    async fn revoke(&self, id: ShareId, revoked_by: &str, now: DateTime<Utc>) -> AppResult<bool>;

    /// Hard-delete a grant. Returns `false` if it did not exist.
    async fn delete(&self, id: ShareId) -> AppResult<bool>;

    /// Stamp `last_accessed_at`, bumping `download_count` when `count` is set.
    async fn touch(
        &self,
        id: ShareId,
        count: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareGrant>>;
}

/// Persistence for approval workflows and per-approver decisions.
#[async_trait]
pub trait ApprovalStore: Send + Sync + 'static {
    /// Insert a pending workflow.
    async fn insert(&self, data: NewApprovalWorkflow) -> AppResult<ApprovalWorkflow>;

    /// Find a workflow by id.
    async fn find_by_id(&self, id: WorkflowId) -> AppResult<Option<ApprovalWorkflow>>;

    /// Pending workflows listing `email` as an approver, newest first.
    async fn list_pending_for_approver(&self, email: &str) -> AppResult<Vec<ApprovalWorkflow>>;

    /// Record a vote. Returns `false` if this approver already voted.
    async fn record_decision(&self, decision: ApproverDecision) -> AppResult<bool>;

    /// Every vote cast on a workflow.
    async fn decisions(&self, id: WorkflowId) -> AppResult<Vec<ApproverDecision>>;

    /// Move a pending workflow to `status`. Returns `false` if it was no
    /// longer pending.
    async fn transition(
        &self,
        id: WorkflowId,
        status: ApprovalStatus,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Move a pending workflow to approved and link its grant in one
    /// step. Returns `false` if it was no longer pending.
    async fn approve(
        &self,
        id: WorkflowId,
        share_id: ShareId,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;
}

/// Append-only audit log.
#[async_trait]
pub trait AuditStore: Send + Sync + 'static {
    /// Append an entry.
    async fn insert(&self, data: NewAuditLogEntry) -> AppResult<AuditLogEntry>;

    /// Entries for a resource, newest first.
    async fn list_for_resource(&self, resource_id: &str) -> AppResult<Vec<AuditLogEntry>>;
}

/// Persistence for share comments.
#[async_trait]
pub trait CommentStore: Send + Sync + 'static {
    /// Insert a pending comment.
    async fn insert(&self, data: NewShareComment) -> AppResult<ShareComment>;

    /// Find a comment by id.
    async fn find_by_id(&self, id: CommentId) -> AppResult<Option<ShareComment>>;

    /// Set the moderation outcome.
    async fn set_status(
        &self,
        id: CommentId,
        status: CommentStatus,
        decided_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareComment>>;
}

/// Persistence for in-app notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Persist a notification.
    async fn insert(&self, data: NewNotification) -> AppResult<Notification>;

    /// Notifications for a user, newest first.
    async fn list_for_user(&self, email: &str) -> AppResult<Vec<Notification>>;
}

/// One handle per store, shared by the services.
#[derive(Clone)]
pub struct Stores {
    /// Document ownership lookups.
    pub documents: Arc<dyn DocumentCatalog>,
    /// Share grants.
    pub shares: Arc<dyn ShareStore>,
    /// Approval workflows.
    pub approvals: Arc<dyn ApprovalStore>,
    /// Audit log.
    pub audit: Arc<dyn AuditStore>,
    /// Comments.
    pub comments: Arc<dyn CommentStore>,
    /// In-app notifications.
    pub notifications: Arc<dyn NotificationStore>,
}

impl Stores {
    /// Stores backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            documents: Arc::new(DocumentRepository::new(pool.clone())),
            shares: Arc::new(ShareRepository::new(pool.clone())),
            approvals: Arc::new(ApprovalRepository::new(pool.clone())),
            audit: Arc::new(AuditLogRepository::new(pool.clone())),
            comments: Arc::new(CommentRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool)),
        }
    }

    /// Process-local stores.
    pub fn memory() -> Self {
        Self {
            documents: Arc::new(MemoryDocumentCatalog::new()),
            shares: Arc::new(MemoryShareStore::new()),
            approvals: Arc::new(MemoryApprovalStore::new()),
            audit: Arc::new(MemoryAuditStore::new()),
            comments: Arc::new(MemoryCommentStore::new()),
            notifications: Arc::new(MemoryNotificationStore::new()),
        }
    }
}
