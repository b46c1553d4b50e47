//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use docshare_auth::{JwtDecoder, PasswordHasher};
use docshare_core::config::AppConfig;
use docshare_core::error::AppError;
use docshare_database::Stores;
use docshare_service::{
    AccessService, ApprovalService, AuditService, CommentService, NotificationDispatcher,
    ShareService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Share registry
    pub share_service: Arc<ShareService>,
    /// Access evaluator
    pub access_service: Arc<AccessService>,
    /// Approval workflow
    pub approval_service: Arc<ApprovalService>,
    /// Share comments
    pub comment_service: Arc<CommentService>,
    /// Audit trail
    pub audit_service: Arc<AuditService>,
    /// Background notification delivery
    pub notifier: Arc<NotificationDispatcher>,
}

impl AppState {
    /// Wire every service over `stores`, with channels built from config.
    pub fn new(config: AppConfig, stores: Stores) -> Result<Self, AppError> {
        let notifier = Arc::new(NotificationDispatcher::from_config(
            &config.notification,
            Arc::clone(&stores.notifications),
        )?);
        Ok(Self::with_notifier(config, stores, notifier))
    }

    /// Wire every service over `stores` with a prepared dispatcher.
    pub fn with_notifier(
        config: AppConfig,
        stores: Stores,
        notifier: Arc<NotificationDispatcher>,
    ) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let audit_service = Arc::new(AuditService::new(Arc::clone(&stores.audit)));
        let access_service = Arc::new(AccessService::new(
            Arc::clone(&stores.documents),
            Arc::clone(&stores.shares),
        ));
        let share_service = Arc::new(ShareService::new(
            Arc::clone(&stores.shares),
            Arc::clone(&stores.documents),
            Arc::clone(&access_service),
            Arc::new(PasswordHasher::new()),
            Arc::clone(&audit_service),
            Arc::clone(&notifier),
        ));
        let approval_service = Arc::new(ApprovalService::new(
            Arc::clone(&stores.approvals),
            Arc::clone(&stores.documents),
            Arc::clone(&share_service),
            Arc::clone(&audit_service),
            Arc::clone(&notifier),
        ));
        let comment_service = Arc::new(CommentService::new(
            Arc::clone(&stores.comments),
            Arc::clone(&stores.documents),
            Arc::clone(&access_service),
            Arc::clone(&audit_service),
            Arc::clone(&notifier),
        ));

        Self {
            config: Arc::new(config),
            jwt_decoder,
            share_service,
            access_service,
            approval_service,
            comment_service,
            audit_service,
            notifier,
        }
    }
}
