//! Approval workflow repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::{ShareId, WorkflowId};
use docshare_entity::approval::{
    ApprovalStatus, ApprovalWorkflow, ApproverDecision, NewApprovalWorkflow,
};

use crate::store::ApprovalStore;

/// Repository for `approval_workflows` and `approval_decisions`.
#[derive(Debug, Clone)]
pub struct ApprovalRepository {
    pool: PgPool,
}

impl ApprovalRepository {
    /// Create a new approval repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApprovalStore for ApprovalRepository {
    async fn insert(&self, data: NewApprovalWorkflow) -> AppResult<ApprovalWorkflow> {
        let wf = data.into_workflow(Utc::now());
        sqlx::query_as::<_, ApprovalWorkflow>(
            "INSERT INTO approval_workflows (id, document_id, initiator_email, recipient_email, \
             approvers, status, access_level, shared_with_app, source_app, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(wf.id)
        .bind(&wf.document_id)
        .bind(&wf.initiator_email)
        .bind(&wf.recipient_email)
        .bind(&wf.approvers)
        .bind(wf.status)
        .bind(wf.access_level)
        .bind(&wf.shared_with_app)
        .bind(&wf.source_app)
        .bind(wf.created_at)
        .bind(wf.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create workflow", e))
    }

    async fn find_by_id(&self, id: WorkflowId) -> AppResult<Option<ApprovalWorkflow>> {
        sqlx::query_as::<_, ApprovalWorkflow>("SELECT * FROM approval_workflows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find workflow", e))
    }

    async fn list_pending_for_approver(&self, email: &str) -> AppResult<Vec<ApprovalWorkflow>> {
        sqlx::query_as::<_, ApprovalWorkflow>(
            "SELECT * FROM approval_workflows \
             WHERE status = 'pending' AND $1 = ANY(approvers) \
             ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list pending workflows", e)
        })
    }

    async fn record_decision(&self, decision: ApproverDecision) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO approval_decisions (workflow_id, approver_email, approved, comment, decided_at) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (workflow_id, approver_email) DO NOTHING",
        )
        .bind(decision.workflow_id)
        .bind(&decision.approver_email)
        .bind(decision.approved)
        .bind(&decision.comment)
        .bind(decision.decided_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record decision", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn decisions(&self, id: WorkflowId) -> AppResult<Vec<ApproverDecision>> {
        sqlx::query_as::<_, ApproverDecision>(
            "SELECT * FROM approval_decisions WHERE workflow_id = $1 ORDER BY decided_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load decisions", e))
    }

    async fn transition(
        &self,
        id: WorkflowId,
        status: ApprovalStatus,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE approval_workflows SET status = $2, resolved_at = $3 \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update workflow", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn approve(
        &self,
        id: WorkflowId,
        share_id: ShareId,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE approval_workflows \
             SET status = 'approved', share_id = $2, resolved_at = $3 \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(share_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to approve workflow", e))?;
        Ok(result.rows_affected() > 0)
    }
}
