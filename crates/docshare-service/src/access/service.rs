//! Access checks against the document catalogue and the share store.

use std::sync::Arc;

use tracing::debug;

use docshare_core::error::AppError;
use docshare_database::{DocumentCatalog, ShareStore};
use docshare_entity::share::AccessDecision;

use super::evaluator::evaluate_grants;
use crate::context::RequestContext;
use crate::validation::require_non_empty;

/// Single source of truth for "can this caller access this document".
///
/// Performs reads only.
#[derive(Clone)]
pub struct AccessService {
    documents: Arc<dyn DocumentCatalog>,
    shares: Arc<dyn ShareStore>,
}

impl std::fmt::Debug for AccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessService").finish_non_exhaustive()
    }
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(documents: Arc<dyn DocumentCatalog>, shares: Arc<dyn ShareStore>) -> Self {
        Self { documents, shares }
    }

    /// Same-app check for the caller.
    pub async fn check(
        &self,
        ctx: &RequestContext,
        document_id: &str,
    ) -> Result<AccessDecision, AppError> {
        let document_id = require_non_empty("document_id", document_id)?;

        if self.is_owner(&document_id, ctx.email()).await? {
            return Ok(AccessDecision::owner());
        }

        let candidates = self
            .shares
            .find_active_for_recipient(&document_id, ctx.email())
            .await?;
        let decision = evaluate_grants(&candidates, ctx.request_time, None);

        debug!(
            document_id = %document_id,
            email = %ctx.email(),
            reason = decision.reason.as_str(),
            "Access evaluated"
        );
        Ok(decision)
    }

    /// Cross-app check: only grants created from `source_app` count, and
    /// pinned grants must name `target_app`.
    pub async fn check_cross_app(
        &self,
        ctx: &RequestContext,
        document_id: &str,
        source_app: &str,
        target_app: &str,
    ) -> Result<AccessDecision, AppError> {
        let document_id = require_non_empty("document_id", document_id)?;
        let source_app = require_non_empty("source_app", source_app)?;
        let target_app = require_non_empty("target_app", target_app)?;

        if self.is_owner(&document_id, ctx.email()).await? {
            return Ok(AccessDecision::owner());
        }

        let candidates: Vec<_> = self
            .shares
            .find_active_for_recipient(&document_id, ctx.email())
            .await?
            .into_iter()
            .filter(|g| g.source_app.eq_ignore_ascii_case(&source_app))
            .collect();
        let decision = evaluate_grants(&candidates, ctx.request_time, Some(&target_app));

        debug!(
            document_id = %document_id,
            email = %ctx.email(),
            source_app = %source_app,
            target_app = %target_app,
            reason = decision.reason.as_str(),
            "Cross-app access evaluated"
        );
        Ok(decision)
    }

    async fn is_owner(&self, document_id: &str, email: &str) -> Result<bool, AppError> {
        Ok(self
            .documents
            .find_document(document_id)
            .await?
            .is_some_and(|doc| doc.is_owned_by(email)))
    }
}
