//! Approval workflow service.
//!
//! A workflow collects one vote per listed approver. A single rejection
//! closes it; once every approver has approved, the grant it asked for is
//! staged, the workflow is approved and linked to it in one store step, and
//! only then is the grant announced. Deadlines are applied lazily whenever
//! a workflow is read or decided.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use docshare_core::error::AppError;
use docshare_core::types::{ShareId, WorkflowId};
use docshare_database::{ApprovalStore, DocumentCatalog};
use docshare_entity::approval::{
    ApprovalStatus, ApprovalWorkflow, ApproverDecision, NewApprovalWorkflow,
};
use docshare_entity::audit::action;
use docshare_entity::notification::NotificationEvent;
use docshare_entity::share::AccessLevel;

use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::notification::NotificationDispatcher;
use crate::share::ShareService;
use crate::validation::{normalize_app, normalize_email, require_non_empty};

const APPROVAL_REQUESTED: &str = "approval.requested";
const APPROVAL_COMPLETED: &str = "approval.completed";

/// Request to start a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiateApprovalRequest {
    /// Document to share once approved.
    pub document_id: String,
    /// Who receives the grant.
    pub recipient_email: String,
    /// Everyone who must approve.
    pub approvers: Vec<String>,
    /// Level of the eventual grant.
    pub access_level: AccessLevel,
    /// Optional consuming-app restriction of the eventual grant.
    pub shared_with_app: Option<String>,
}

/// Where a workflow stands after a decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionOutcome {
    /// Status after the decision.
    pub status: ApprovalStatus,
    /// Grant created on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_id: Option<ShareId>,
}

/// Runs approval workflows.
#[derive(Clone)]
pub struct ApprovalService {
    approvals: Arc<dyn ApprovalStore>,
    documents: Arc<dyn DocumentCatalog>,
    shares: Arc<ShareService>,
    audit: Arc<AuditService>,
    notifier: Arc<NotificationDispatcher>,
}

impl std::fmt::Debug for ApprovalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalService").finish_non_exhaustive()
    }
}

impl ApprovalService {
    /// Creates a new approval service.
    pub fn new(
        approvals: Arc<dyn ApprovalStore>,
        documents: Arc<dyn DocumentCatalog>,
        shares: Arc<ShareService>,
        audit: Arc<AuditService>,
        notifier: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            approvals,
            documents,
            shares,
            audit,
            notifier,
        }
    }

    /// Start a workflow. Admin only.
    pub async fn initiate(
        &self,
        ctx: &RequestContext,
        req: InitiateApprovalRequest,
    ) -> Result<ApprovalWorkflow, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only admins can start approval workflows",
            ));
        }

        let document_id = require_non_empty("document_id", &req.document_id)?;
        let recipient_email = normalize_email("recipient_email", &req.recipient_email)?;

        let mut seen = HashSet::new();
        let mut approvers = Vec::with_capacity(req.approvers.len());
        for raw in &req.approvers {
            let email = normalize_email("approvers", raw)?;
            if seen.insert(email.clone()) {
                approvers.push(email);
            }
        }
        if approvers.is_empty() {
            return Err(AppError::validation("At least one approver is required"));
        }

        self.documents
            .find_document(&document_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;

        let workflow = self
            .approvals
            .insert(NewApprovalWorkflow {
                document_id,
                initiator_email: ctx.email().to_string(),
                recipient_email,
                approvers,
                access_level: req.access_level,
                shared_with_app: normalize_app(req.shared_with_app.as_deref()),
                source_app: ctx.app().to_string(),
            })
            .await?;

        info!(
            workflow_id = %workflow.id,
            document_id = %workflow.document_id,
            approvers = workflow.approvers.len(),
            "Approval workflow started"
        );

        self.audit
            .success(
                ctx,
                action::APPROVAL_INITIATED,
                action::RESOURCE_APPROVAL,
                &workflow.id.to_string(),
                json!({
                    "document_id": workflow.document_id,
                    "recipient_email": workflow.recipient_email,
                    "approvers": workflow.approvers,
                    "access_level": workflow.access_level,
                    "expires_at": workflow.expires_at,
                }),
            )
            .await;

        for approver in &workflow.approvers {
            self.notifier
                .dispatch(NotificationEvent::new(
                    approver.clone(),
                    APPROVAL_REQUESTED,
                    workflow.id.to_string(),
                    format!(
                        "{} asks you to approve sharing a document with {}",
                        workflow.initiator_email, workflow.recipient_email
                    ),
                ));
        }

        Ok(workflow)
    }

    /// Cast the caller's vote.
    pub async fn decide(
        &self,
        ctx: &RequestContext,
        workflow_id: WorkflowId,
        approved: bool,
        comment: Option<String>,
    ) -> Result<DecisionOutcome, AppError> {
        let workflow = self.load(ctx, workflow_id).await?;

        if workflow.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "Approval workflow is already {}",
                workflow.status
            )));
        }
        if !workflow.is_approver(ctx.email()) {
            return Err(AppError::authorization(
                "Caller is not an approver of this workflow",
            ));
        }

        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let recorded = self
            .approvals
            .record_decision(ApproverDecision {
                workflow_id,
                approver_email: ctx.email().to_string(),
                approved,
                comment: comment.clone(),
                decided_at: ctx.request_time,
            })
            .await?;

        let decisions = self.approvals.decisions(workflow_id).await?;
        if !recorded {
            let previous = decisions
                .iter()
                .find(|d| d.approver_email == ctx.email())
                .map(|d| d.approved);
            if previous != Some(approved) {
                return Err(AppError::conflict(
                    "Approver has already cast a different vote",
                ));
            }
        }

        if !approved {
            return self.reject(ctx, &workflow, comment).await;
        }

        let approved_by: HashSet<&str> = decisions
            .iter()
            .filter(|d| d.approved)
            .map(|d| d.approver_email.as_str())
            .collect();
        let outstanding = workflow
            .approvers
            .iter()
            .filter(|a| !approved_by.contains(a.as_str()))
            .count();

        if outstanding > 0 {
            if recorded {
                self.audit
                    .success(
                        ctx,
                        action::APPROVAL_DECISION,
                        action::RESOURCE_APPROVAL,
                        &workflow_id.to_string(),
                        json!({ "approved": true, "comment": comment, "outstanding": outstanding }),
                    )
                    .await;
            }
            return Ok(DecisionOutcome {
                status: ApprovalStatus::Pending,
                share_id: None,
            });
        }

        // Also reached by a repeated vote when an earlier completion failed.
        self.complete(ctx, &workflow).await
    }

    async fn reject(
        &self,
        ctx: &RequestContext,
        workflow: &ApprovalWorkflow,
        comment: Option<String>,
    ) -> Result<DecisionOutcome, AppError> {
        if !self
            .approvals
            .transition(workflow.id, ApprovalStatus::Rejected, ctx.request_time)
            .await?
        {
            return Err(AppError::conflict("Approval workflow was already resolved"));
        }

        info!(workflow_id = %workflow.id, rejected_by = %ctx.email(), "Approval workflow rejected");

        self.audit
            .success(
                ctx,
                action::APPROVAL_REJECTED,
                action::RESOURCE_APPROVAL,
                &workflow.id.to_string(),
                json!({
                    "status": { "from": "pending", "to": "rejected" },
                    "comment": comment,
                }),
            )
            .await;

        self.notifier
            .dispatch(NotificationEvent::new(
                workflow.initiator_email.clone(),
                APPROVAL_COMPLETED,
                workflow.id.to_string(),
                format!("{} rejected your approval request", ctx.email()),
            ));

        Ok(DecisionOutcome {
            status: ApprovalStatus::Rejected,
            share_id: None,
        })
    }

    async fn complete(
        &self,
        ctx: &RequestContext,
        workflow: &ApprovalWorkflow,
    ) -> Result<DecisionOutcome, AppError> {
        let grant = self.shares.stage_approved_share(ctx, workflow).await?;

        let won = match self
            .approvals
            .approve(workflow.id, grant.id, ctx.request_time)
            .await
        {
            Ok(won) => won,
            Err(e) => {
                self.shares.discard_staged_share(grant.id).await;
                return Err(e);
            }
        };
        if !won {
            // Another approver's request completed it first.
            self.shares.discard_staged_share(grant.id).await;
            let current = self.find(workflow.id).await?;
            return Ok(DecisionOutcome {
                status: current.status,
                share_id: current.share_id,
            });
        }

        self.shares.publish_approved_share(ctx, &grant).await;

        info!(
            workflow_id = %workflow.id,
            share_id = %grant.id,
            "Approval workflow completed"
        );

        self.audit
            .success(
                ctx,
                action::APPROVAL_APPROVED,
                action::RESOURCE_APPROVAL,
                &workflow.id.to_string(),
                json!({
                    "status": { "from": "pending", "to": "approved" },
                    "share_id": grant.id,
                }),
            )
            .await;

        self.notifier
            .dispatch(NotificationEvent::new(
                workflow.initiator_email.clone(),
                APPROVAL_COMPLETED,
                workflow.id.to_string(),
                format!(
                    "All approvers signed off; {} now has {} access",
                    workflow.recipient_email, workflow.access_level
                ),
            ));

        Ok(DecisionOutcome {
            status: ApprovalStatus::Approved,
            share_id: Some(grant.id),
        })
    }

    /// Fetch a workflow visible to the caller.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        workflow_id: WorkflowId,
    ) -> Result<ApprovalWorkflow, AppError> {
        let workflow = self.load(ctx, workflow_id).await?;
        let email = ctx.email();
        let visible = ctx.is_admin()
            || workflow.initiator_email == email
            || workflow.recipient_email == email
            || workflow.is_approver(email);
        if !visible {
            return Err(AppError::authorization("Not a party to this workflow"));
        }
        Ok(workflow)
    }

    /// Pending workflows waiting on the caller.
    pub async fn pending_for(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<ApprovalWorkflow>, AppError> {
        let mut pending = Vec::new();
        for workflow in self.approvals.list_pending_for_approver(ctx.email()).await? {
            let workflow = self.expire_if_lapsed(ctx, workflow).await?;
            if workflow.status == ApprovalStatus::Pending {
                pending.push(workflow);
            }
        }
        Ok(pending)
    }

    async fn find(&self, workflow_id: WorkflowId) -> Result<ApprovalWorkflow, AppError> {
        self.approvals
            .find_by_id(workflow_id)
            .await?
            .ok_or_else(|| AppError::not_found("Approval workflow not found"))
    }

    async fn load(
        &self,
        ctx: &RequestContext,
        workflow_id: WorkflowId,
    ) -> Result<ApprovalWorkflow, AppError> {
        let workflow = self.find(workflow_id).await?;
        self.expire_if_lapsed(ctx, workflow).await
    }

    /// Move a pending workflow past its deadline to expired.
    async fn expire_if_lapsed(
        &self,
        ctx: &RequestContext,
        workflow: ApprovalWorkflow,
    ) -> Result<ApprovalWorkflow, AppError> {
        if !workflow.is_lapsed_at(ctx.request_time) {
            return Ok(workflow);
        }

        if self
            .approvals
            .transition(workflow.id, ApprovalStatus::Expired, ctx.request_time)
            .await?
        {
            warn!(workflow_id = %workflow.id, "Approval workflow expired");
            self.audit
                .success(
                    ctx,
                    action::APPROVAL_EXPIRED,
                    action::RESOURCE_APPROVAL,
                    &workflow.id.to_string(),
                    json!({
                        "status": { "from": "pending", "to": "expired" },
                        "expires_at": workflow.expires_at,
                    }),
                )
                .await;
        }

        self.find(workflow.id).await
    }
}
