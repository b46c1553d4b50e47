//! Share grant lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, warn};

use docshare_auth::PasswordHasher;
use docshare_core::error::{AppError, ErrorKind};
use docshare_core::types::ShareId;
use docshare_database::{DocumentCatalog, ShareStore};
use docshare_entity::approval::ApprovalWorkflow;
use docshare_entity::audit::{AuditStatus, action};
use docshare_entity::notification::NotificationEvent;
use docshare_entity::share::{AccessLevel, NewShareGrant, ShareGrant};

use super::export::ShareExport;
use super::stats::ShareStats;
use crate::access::AccessService;
use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::notification::NotificationDispatcher;
use crate::validation::{
    normalize_app, normalize_email, require_non_empty, validate_password, validate_slug,
};

/// Optional settings of a new grant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareOptions {
    /// Days until expiry, counted from now. At least 1.
    pub expires_days: Option<i64>,
    /// Plaintext link password; stored only as a hash.
    pub password: Option<String>,
    /// Public slug, `[a-z0-9-]{3,64}`.
    pub custom_slug: Option<String>,
    /// Restrict the grant to one consuming app.
    pub shared_with_app: Option<String>,
    /// Count downloads.
    #[serde(default)]
    pub track_downloads: bool,
}

/// Request to create a grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareRequest {
    /// Document to share.
    pub document_id: String,
    /// Recipient email.
    pub shared_with_email: String,
    /// Capability.
    pub access_level: AccessLevel,
    /// Optional settings.
    #[serde(default)]
    pub options: ShareOptions,
}

/// Result of a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedShare {
    /// New grant id.
    pub share_id: ShareId,
    /// `/d/{slug}` when a slug was reserved.
    pub share_link: Option<String>,
}

/// What a successfully opened link grants.
#[derive(Debug, Clone, Serialize)]
pub struct LinkAccess {
    /// Grant behind the link.
    pub share_id: ShareId,
    /// Linked document.
    pub document_id: String,
    /// Capability.
    pub access_level: AccessLevel,
}

/// Owns the share grant lifecycle.
#[derive(Clone)]
pub struct ShareService {
    shares: Arc<dyn ShareStore>,
    documents: Arc<dyn DocumentCatalog>,
    access: Arc<AccessService>,
    hasher: Arc<PasswordHasher>,
    audit: Arc<AuditService>,
    notifier: Arc<NotificationDispatcher>,
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService").finish_non_exhaustive()
    }
}

/// Validated grant fields, before the ownership check.
struct ValidatedShare {
    document_id: String,
    recipient: String,
    access_level: AccessLevel,
    expires_at: Option<DateTime<Utc>>,
    password: Option<String>,
    custom_slug: Option<String>,
    shared_with_app: Option<String>,
    track_downloads: bool,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        documents: Arc<dyn DocumentCatalog>,
        access: Arc<AccessService>,
        hasher: Arc<PasswordHasher>,
        audit: Arc<AuditService>,
        notifier: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            shares,
            documents,
            access,
            hasher,
            audit,
            notifier,
        }
    }

    /// Create a grant as the document's owner.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        req: CreateShareRequest,
    ) -> Result<CreatedShare, AppError> {
        let validated = validate_request(req, ctx.request_time)?;

        let document = self
            .documents
            .find_document(&validated.document_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;
        if !document.is_owned_by(ctx.email()) {
            return Err(AppError::authorization(
                "Only the document owner can share it",
            ));
        }

        if let Some(slug) = &validated.custom_slug {
            if self.shares.find_active_by_slug(slug).await?.is_some() {
                self.audit_slug_conflict(ctx, &validated.document_id, slug)
                    .await;
                return Err(AppError::conflict(format!(
                    "Custom slug '{slug}' is already in use"
                )));
            }
        }

        let grant = self
            .store_grant(ctx, validated, ctx.email().to_string(), None)
            .await?;
        self.announce_grant(ctx, &grant).await;

        Ok(CreatedShare {
            share_id: grant.id,
            share_link: grant.share_link(),
        })
    }

    /// Insert the grant an approved workflow asked for, without announcing
    /// it. The initiating admin is recorded as `shared_by`; admin authority
    /// stands in for document ownership here.
    ///
    /// The caller either publishes the grant with
    /// [`publish_approved_share`](Self::publish_approved_share) or drops it
    /// with [`discard_staged_share`](Self::discard_staged_share).
    pub async fn stage_approved_share(
        &self,
        ctx: &RequestContext,
        workflow: &ApprovalWorkflow,
    ) -> Result<ShareGrant, AppError> {
        let validated = ValidatedShare {
            document_id: workflow.document_id.clone(),
            recipient: workflow.recipient_email.clone(),
            access_level: workflow.access_level,
            expires_at: None,
            password: None,
            custom_slug: None,
            shared_with_app: workflow.shared_with_app.clone(),
            track_downloads: false,
        };
        self.store_grant(
            ctx,
            validated,
            workflow.initiator_email.clone(),
            Some(workflow.source_app.clone()),
        )
        .await
    }

    /// Audit and announce a staged grant once its workflow is approved.
    pub async fn publish_approved_share(&self, ctx: &RequestContext, grant: &ShareGrant) {
        self.announce_grant(ctx, grant).await;
    }

    /// Remove a staged grant whose workflow was resolved elsewhere.
    pub async fn discard_staged_share(&self, share_id: ShareId) {
        match self.shares.delete(share_id).await {
            Ok(_) => debug!(share_id = %share_id, "Staged share discarded"),
            Err(e) => error!(share_id = %share_id, error = %e, "Failed to discard staged share"),
        }
    }

    async fn store_grant(
        &self,
        ctx: &RequestContext,
        validated: ValidatedShare,
        shared_by: String,
        source_app: Option<String>,
    ) -> Result<ShareGrant, AppError> {
        let password_hash = match &validated.password {
            Some(password) => Some(self.hasher.hash_password(password)?),
            None => None,
        };

        let data = NewShareGrant {
            document_id: validated.document_id,
            shared_by,
            shared_with_email: validated.recipient,
            access_level: validated.access_level,
            expires_at: validated.expires_at,
            password_hash,
            custom_slug: validated.custom_slug,
            source_app: source_app.unwrap_or_else(|| ctx.app().to_string()),
            shared_with_app: validated.shared_with_app,
            track_downloads: validated.track_downloads,
        };

        let document_id = data.document_id.clone();
        let slug = data.custom_slug.clone();
        match self.shares.insert(data).await {
            Err(e) if e.kind == ErrorKind::Conflict => {
                if let Some(slug) = &slug {
                    self.audit_slug_conflict(ctx, &document_id, slug).await;
                }
                Err(e)
            }
            result => result,
        }
    }

    async fn announce_grant(&self, ctx: &RequestContext, grant: &ShareGrant) {
        info!(
            share_id = %grant.id,
            document_id = %grant.document_id,
            shared_by = %grant.shared_by,
            access_level = %grant.access_level,
            "Share created"
        );

        self.audit
            .success(
                ctx,
                action::SHARE_CREATED,
                action::RESOURCE_SHARE,
                &grant.id.to_string(),
                json!({
                    "document_id": grant.document_id,
                    "shared_with_email": grant.shared_with_email,
                    "access_level": grant.access_level,
                    "expires_at": grant.expires_at,
                    "custom_slug": grant.custom_slug,
                    "shared_with_app": grant.shared_with_app,
                    "password_protected": grant.is_password_protected(),
                }),
            )
            .await;

        self.notifier
            .dispatch(NotificationEvent::new(
                grant.shared_with_email.clone(),
                action::SHARE_CREATED,
                grant.id.to_string(),
                format!(
                    "{} shared a document with you ({} access)",
                    grant.shared_by, grant.access_level
                ),
            ));
    }

    async fn audit_slug_conflict(&self, ctx: &RequestContext, document_id: &str, slug: &str) {
        self.audit
            .record(
                ctx,
                action::SHARE_CREATED,
                action::RESOURCE_DOCUMENT,
                document_id,
                Some(json!({ "custom_slug": slug, "error": "slug_conflict" })),
                AuditStatus::Failure,
            )
            .await;
    }

    /// Soft-revoke a grant. Revoking an inactive grant succeeds without a
    /// write. Returns whether this call revoked it.
    pub async fn revoke_share(
        &self,
        ctx: &RequestContext,
        share_id: ShareId,
    ) -> Result<bool, AppError> {
        let grant = self
            .shares
            .find_by_id(share_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        let is_owner = grant.shared_by.eq_ignore_ascii_case(ctx.email());
        let is_cross_app_recipient =
            grant.is_cross_app() && grant.shared_with_email.eq_ignore_ascii_case(ctx.email());
        if !is_owner && !is_cross_app_recipient {
            return Err(AppError::authorization(
                "Only the owner or the cross-app recipient can revoke this share",
            ));
        }

        if !grant.is_active {
            return Ok(false);
        }
        if !self
            .shares
            .revoke(share_id, ctx.email(), ctx.request_time)
            .await?
        {
            return Ok(false);
        }

        info!(share_id = %share_id, revoked_by = %ctx.email(), "Share revoked");

        self.audit
            .success(
                ctx,
                action::SHARE_REVOKED,
                action::RESOURCE_SHARE,
                &share_id.to_string(),
                json!({
                    "document_id": grant.document_id,
                    "shared_with_email": grant.shared_with_email,
                    "is_active": { "from": true, "to": false },
                }),
            )
            .await;

        if is_owner {
            self.notifier
                .dispatch(NotificationEvent::new(
                    grant.shared_with_email.clone(),
                    action::SHARE_REVOKED,
                    share_id.to_string(),
                    format!("{} revoked your access to a shared document", grant.shared_by),
                ));
        }

        Ok(true)
    }

    /// Hard-delete a grant. Owner only.
    pub async fn purge_share(&self, ctx: &RequestContext, share_id: ShareId) -> Result<(), AppError> {
        let grant = self
            .shares
            .find_by_id(share_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        if !grant.shared_by.eq_ignore_ascii_case(ctx.email()) {
            return Err(AppError::authorization("Only the owner can purge this share"));
        }

        if !self.shares.delete(share_id).await? {
            return Err(AppError::not_found("Share not found"));
        }

        warn!(share_id = %share_id, purged_by = %ctx.email(), "Share purged");

        self.audit
            .success(
                ctx,
                action::SHARE_PURGED,
                action::RESOURCE_SHARE,
                &share_id.to_string(),
                json!({
                    "document_id": grant.document_id,
                    "shared_with_email": grant.shared_with_email,
                    "access_level": grant.access_level,
                    "was_active": grant.is_active,
                }),
            )
            .await;

        Ok(())
    }

    /// Grants the caller created, newest first.
    pub async fn list_shares(&self, ctx: &RequestContext) -> Result<Vec<ShareGrant>, AppError> {
        self.shares.list_by_owner(ctx.email()).await
    }

    /// Active grants addressed to the caller, newest first.
    pub async fn list_received(&self, ctx: &RequestContext) -> Result<Vec<ShareGrant>, AppError> {
        self.shares.list_by_recipient(ctx.email()).await
    }

    /// Aggregates over the caller's grants.
    pub async fn share_stats(&self, ctx: &RequestContext) -> Result<ShareStats, AppError> {
        let grants = self.list_shares(ctx).await?;
        Ok(ShareStats::compute(&grants, ctx.request_time))
    }

    /// CSV of every grant the caller created.
    pub async fn bulk_export(&self, ctx: &RequestContext) -> Result<ShareExport, AppError> {
        let grants = self.list_shares(ctx).await?;
        Ok(ShareExport::render(&grants, ctx.request_time))
    }

    /// Resolve a public slug, checking the link password if one is set.
    pub async fn open_link(
        &self,
        ctx: &RequestContext,
        slug: &str,
        password: Option<&str>,
    ) -> Result<LinkAccess, AppError> {
        let grant = self
            .shares
            .find_active_by_slug(slug.trim())
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))?;

        if grant.is_expired_at(ctx.request_time) {
            return Err(AppError::authorization("Share link has expired"));
        }

        if let Some(hash) = &grant.password_hash {
            let supplied = password.unwrap_or_default();
            if !self.hasher.verify_password(supplied, hash)? {
                self.audit
                    .record(
                        ctx,
                        action::SHARE_LINK_OPENED,
                        action::RESOURCE_SHARE,
                        &grant.id.to_string(),
                        Some(json!({ "error": "invalid_password" })),
                        AuditStatus::Failure,
                    )
                    .await;
                return Err(AppError::authentication("Invalid share password"));
            }
        }

        self.shares.touch(grant.id, false, ctx.request_time).await?;

        self.audit
            .success(
                ctx,
                action::SHARE_LINK_OPENED,
                action::RESOURCE_SHARE,
                &grant.id.to_string(),
                json!({ "custom_slug": grant.custom_slug }),
            )
            .await;

        Ok(LinkAccess {
            share_id: grant.id,
            document_id: grant.document_id,
            access_level: grant.access_level,
        })
    }

    /// Record a download by the grant's recipient. Returns the new count.
    pub async fn record_download(
        &self,
        ctx: &RequestContext,
        share_id: ShareId,
    ) -> Result<i32, AppError> {
        let grant = self
            .shares
            .find_by_id(share_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        if !grant.shared_with_email.eq_ignore_ascii_case(ctx.email()) {
            return Err(AppError::authorization(
                "Only the recipient can download through this share",
            ));
        }

        if !grant.is_active {
            return Err(AppError::authorization("Share has been revoked"));
        }

        let decision = self.access.check(ctx, &grant.document_id).await?;
        if !decision.has_access {
            return Err(AppError::authorization(format!(
                "Access denied: {}",
                decision.reason.as_str()
            )));
        }
        if !decision
            .effective_level()
            .is_some_and(|level| level.has_at_least(AccessLevel::Download))
        {
            return Err(AppError::authorization("This share does not permit downloads"));
        }

        let updated = self
            .shares
            .touch(share_id, grant.track_downloads, ctx.request_time)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        self.audit
            .success(
                ctx,
                action::SHARE_DOWNLOADED,
                action::RESOURCE_SHARE,
                &share_id.to_string(),
                json!({
                    "document_id": updated.document_id,
                    "download_count": updated.download_count,
                    "tracked": updated.track_downloads,
                }),
            )
            .await;

        Ok(updated.download_count)
    }
}

/// Check every field before anything is written.
fn validate_request(
    req: CreateShareRequest,
    now: DateTime<Utc>,
) -> Result<ValidatedShare, AppError> {
    let document_id = require_non_empty("document_id", &req.document_id)?;
    let recipient = normalize_email("shared_with_email", &req.shared_with_email)?;
    let options = req.options;

    let expires_at = match options.expires_days {
        Some(days) if days < 1 => {
            return Err(AppError::validation("expires_days must be at least 1"));
        }
        Some(days) => Some(
            Duration::try_days(days)
                .and_then(|d| now.checked_add_signed(d))
                .ok_or_else(|| AppError::validation("expires_days is too large"))?,
        ),
        None => None,
    };

    let custom_slug = options
        .custom_slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if let Some(slug) = &custom_slug {
        validate_slug(slug)?;
    }

    let password = options.password.filter(|p| !p.is_empty());
    if let Some(password) = &password {
        validate_password(password)?;
    }

    Ok(ValidatedShare {
        document_id,
        recipient,
        access_level: req.access_level,
        expires_at,
        password,
        custom_slug,
        shared_with_app: normalize_app(options.shared_with_app.as_deref()),
        track_downloads: options.track_downloads,
    })
}
