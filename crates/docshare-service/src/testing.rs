//! Service wiring over the in-memory stores, shared by unit tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use docshare_auth::{Identity, PasswordHasher, Role};
use docshare_database::memory::{
    MemoryApprovalStore, MemoryAuditStore, MemoryCommentStore, MemoryDocumentCatalog,
    MemoryNotificationStore, MemoryShareStore,
};
use docshare_database::{DocumentCatalog, NotificationStore, ShareStore};
use docshare_entity::document::DocumentRecord;
use docshare_entity::notification::{ChannelKind, Notification};

use crate::notification::{InAppChannel, RetryPolicy};
use crate::{
    AccessService, ApprovalService, AuditService, CommentService, NotificationDispatcher,
    RequestContext, ShareService,
};

pub(crate) const OWNER: &str = "owner@example.com";
pub(crate) const TENANT: &str = "tenant@example.com";
pub(crate) const ADMIN: &str = "admin@example.com";
pub(crate) const APP: &str = "fintutto";

pub(crate) struct Fixture {
    pub documents: Arc<MemoryDocumentCatalog>,
    pub share_store: Arc<MemoryShareStore>,
    pub approval_store: Arc<MemoryApprovalStore>,
    pub audit_store: Arc<MemoryAuditStore>,
    pub notification_store: Arc<MemoryNotificationStore>,
    pub notifier: Arc<NotificationDispatcher>,
    pub access: Arc<AccessService>,
    pub shares: Arc<ShareService>,
    pub approvals: ApprovalService,
    pub comments: CommentService,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::wrapping_shares(|store| store as Arc<dyn ShareStore>).await
    }

    /// Fixture whose services see the share store through `wrap`.
    pub async fn wrapping_shares(
        wrap: impl FnOnce(Arc<MemoryShareStore>) -> Arc<dyn ShareStore>,
    ) -> Self {
        let documents = Arc::new(MemoryDocumentCatalog::new());
        let share_store = Arc::new(MemoryShareStore::new());
        let approval_store = Arc::new(MemoryApprovalStore::new());
        let audit_store = Arc::new(MemoryAuditStore::new());
        let comment_store = Arc::new(MemoryCommentStore::new());
        let notification_store = Arc::new(MemoryNotificationStore::new());

        let audit = Arc::new(AuditService::new(audit_store.clone()));
        let notifier = Arc::new(
            NotificationDispatcher::new(
                RetryPolicy {
                    timeout: Duration::from_millis(200),
                    max_retries: 0,
                    initial_backoff: Duration::from_millis(1),
                },
                vec![ChannelKind::InApp],
            )
            .with_channel(Arc::new(InAppChannel::new(notification_store.clone()))),
        );
        let shares_seen = wrap(share_store.clone());
        let access = Arc::new(AccessService::new(documents.clone(), shares_seen.clone()));
        let shares = Arc::new(ShareService::new(
            shares_seen,
            documents.clone(),
            access.clone(),
            Arc::new(PasswordHasher::new()),
            audit.clone(),
            notifier.clone(),
        ));
        let approvals = ApprovalService::new(
            approval_store.clone(),
            documents.clone(),
            shares.clone(),
            audit.clone(),
            notifier.clone(),
        );
        let comments = CommentService::new(
            comment_store,
            documents.clone(),
            access.clone(),
            audit,
            notifier.clone(),
        );

        let fixture = Self {
            documents,
            share_store,
            approval_store,
            audit_store,
            notification_store,
            notifier,
            access,
            shares,
            approvals,
            comments,
        };
        fixture.add_document("doc-1", OWNER).await;
        fixture
    }

    pub async fn add_document(&self, id: &str, owner: &str) {
        self.documents
            .upsert_document(&DocumentRecord {
                id: id.to_string(),
                owner_email: owner.to_string(),
                title: format!("Document {id}"),
                source_app: APP.to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    /// In-app notifications for `email`, once background delivery settles.
    pub async fn inbox(&self, email: &str) -> Vec<Notification> {
        self.notifier.drain().await;
        self.notification_store.list_for_user(email).await.unwrap()
    }

    pub async fn audit_actions(&self) -> Vec<String> {
        self.audit_store
            .all()
            .await
            .into_iter()
            .map(|e| e.action)
            .collect()
    }
}

pub(crate) fn ctx(email: &str) -> RequestContext {
    ctx_in(email, APP)
}

pub(crate) fn ctx_in(email: &str, app: &str) -> RequestContext {
    RequestContext::new(Identity::new(email, Role::Member, app), None, None)
}

pub(crate) fn admin_ctx(email: &str) -> RequestContext {
    RequestContext::new(Identity::new(email, Role::Admin, APP), None, None)
}
