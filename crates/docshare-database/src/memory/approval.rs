//! In-memory approval workflow store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::types::{ShareId, WorkflowId};
use docshare_entity::approval::{
    ApprovalStatus, ApprovalWorkflow, ApproverDecision, NewApprovalWorkflow,
};

use crate::store::ApprovalStore;

#[derive(Debug, Default)]
struct InnerState {
    workflows: HashMap<WorkflowId, ApprovalWorkflow>,
    /// Keyed by (workflow, approver); one vote per approver.
    decisions: HashMap<(WorkflowId, String), ApproverDecision>,
}

/// Approval store with per-approver vote deduplication.
#[derive(Debug, Clone, Default)]
pub struct MemoryApprovalStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryApprovalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a workflow's deadline. Returns `false` if unknown.
    pub async fn set_expires_at(&self, id: WorkflowId, expires_at: DateTime<Utc>) -> bool {
        let mut state = self.state.write().await;
        match state.workflows.get_mut(&id) {
            Some(wf) => {
                wf.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ApprovalStore for MemoryApprovalStore {
    async fn insert(&self, data: NewApprovalWorkflow) -> AppResult<ApprovalWorkflow> {
        let wf = data.into_workflow(Utc::now());
        self.state.write().await.workflows.insert(wf.id, wf.clone());
        Ok(wf)
    }

    async fn find_by_id(&self, id: WorkflowId) -> AppResult<Option<ApprovalWorkflow>> {
        Ok(self.state.read().await.workflows.get(&id).cloned())
    }

    async fn list_pending_for_approver(&self, email: &str) -> AppResult<Vec<ApprovalWorkflow>> {
        let state = self.state.read().await;
        let mut workflows: Vec<ApprovalWorkflow> = state
            .workflows
            .values()
            .filter(|wf| wf.status == ApprovalStatus::Pending && wf.is_approver(email))
            .cloned()
            .collect();
        workflows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(workflows)
    }

    async fn record_decision(&self, decision: ApproverDecision) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if !state.workflows.contains_key(&decision.workflow_id) {
            return Err(AppError::not_found("Approval workflow not found"));
        }
        let key = (decision.workflow_id, decision.approver_email.clone());
        if state.decisions.contains_key(&key) {
            return Ok(false);
        }
        state.decisions.insert(key, decision);
        Ok(true)
    }

    async fn decisions(&self, id: WorkflowId) -> AppResult<Vec<ApproverDecision>> {
        let state = self.state.read().await;
        let mut decisions: Vec<ApproverDecision> = state
            .decisions
            .values()
            .filter(|d| d.workflow_id == id)
            .cloned()
            .collect();
        decisions.sort_by(|a, b| a.decided_at.cmp(&b.decided_at));
        Ok(decisions)
    }

    async fn transition(
        &self,
        id: WorkflowId,
        status: ApprovalStatus,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.workflows.get_mut(&id) {
            Some(wf) if wf.status.can_transition_to(status) => {
                wf.status = status;
                wf.resolved_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn approve(
        &self,
        id: WorkflowId,
        share_id: ShareId,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.workflows.get_mut(&id) {
            Some(wf) if wf.status.can_transition_to(ApprovalStatus::Approved) => {
                wf.status = ApprovalStatus::Approved;
                wf.share_id = Some(share_id);
                wf.resolved_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
