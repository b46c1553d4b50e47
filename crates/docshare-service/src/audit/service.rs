//! Audit recording and lookup.

use std::sync::Arc;

use tracing::error;

use docshare_core::error::AppError;
use docshare_database::AuditStore;
use docshare_entity::audit::{AuditLogEntry, AuditStatus, NewAuditLogEntry};

use crate::context::RequestContext;

/// Records sensitive actions. Recording never fails the caller.
#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Append an entry attributed to the request's caller.
    ///
    /// Storage errors are logged and swallowed.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        action: &str,
        resource_type: &str,
        resource_id: &str,
        changes: Option<serde_json::Value>,
        status: AuditStatus,
    ) {
        let entry = NewAuditLogEntry {
            actor_email: ctx.email().to_string(),
            action: action.to_string(),
            resource_type: resource_type.to_string(),
            resource_id: resource_id.to_string(),
            changes,
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
            status,
        };

        if let Err(e) = self.store.insert(entry).await {
            error!(
                action = %action,
                resource_id = %resource_id,
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    /// Shorthand for a successful action.
    pub async fn success(
        &self,
        ctx: &RequestContext,
        action: &str,
        resource_type: &str,
        resource_id: &str,
        changes: serde_json::Value,
    ) {
        self.record(
            ctx,
            action,
            resource_type,
            resource_id,
            Some(changes),
            AuditStatus::Success,
        )
        .await;
    }

    /// Entries for a resource, newest first. Admins only.
    pub async fn for_resource(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
    ) -> Result<Vec<AuditLogEntry>, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only admins may read the audit trail",
            ));
        }
        self.store.list_for_resource(resource_id).await
    }
}
