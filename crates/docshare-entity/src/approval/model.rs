//! Approval workflow entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docshare_core::types::{ShareId, WorkflowId};

use super::status::ApprovalStatus;
use crate::share::AccessLevel;

/// Days a workflow stays open for decisions.
pub const APPROVAL_TTL_DAYS: i64 = 7;

/// A multi-approver gate in front of a share grant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApprovalWorkflow {
    /// Unique workflow identifier.
    pub id: WorkflowId,
    /// Document to be shared.
    pub document_id: String,
    /// Admin who started the workflow; becomes `shared_by` of the grant.
    pub initiator_email: String,
    /// Future recipient of the grant.
    pub recipient_email: String,
    /// Ordered, de-duplicated, lower-cased approver emails.
    pub approvers: Vec<String>,
    /// Current status.
    pub status: ApprovalStatus,
    /// Level the resulting grant will carry.
    pub access_level: AccessLevel,
    /// Consuming-app restriction for the resulting grant.
    pub shared_with_app: Option<String>,
    /// App the initiator acted from.
    pub source_app: String,
    /// When the workflow was started.
    pub created_at: DateTime<Utc>,
    /// Decision deadline.
    pub expires_at: DateTime<Utc>,
    /// When a terminal status was reached.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Grant created on approval.
    pub share_id: Option<ShareId>,
}

impl ApprovalWorkflow {
    /// Whether `email` is a listed approver.
    pub fn is_approver(&self, email: &str) -> bool {
        self.approvers.iter().any(|a| a == email)
    }

    /// Pending but past the deadline at `now`.
    pub fn is_lapsed_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ApprovalStatus::Pending && self.expires_at <= now
    }
}

/// One approver's recorded vote.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApproverDecision {
    /// Workflow voted on.
    pub workflow_id: WorkflowId,
    /// Approver email.
    pub approver_email: String,
    /// True for approve, false for reject.
    pub approved: bool,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// When the vote was cast.
    pub decided_at: DateTime<Utc>,
}

/// Data required to start a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApprovalWorkflow {
    /// Document to be shared.
    pub document_id: String,
    /// Initiating admin.
    pub initiator_email: String,
    /// Future recipient.
    pub recipient_email: String,
    /// Normalized approver list (non-empty).
    pub approvers: Vec<String>,
    /// Level for the resulting grant.
    pub access_level: AccessLevel,
    /// Consuming-app restriction.
    pub shared_with_app: Option<String>,
    /// Initiator's app.
    pub source_app: String,
}

impl NewApprovalWorkflow {
    /// Materialize a pending workflow expiring after the fixed window.
    pub fn into_workflow(self, now: DateTime<Utc>) -> ApprovalWorkflow {
        ApprovalWorkflow {
            id: WorkflowId::new(),
            document_id: self.document_id,
            initiator_email: self.initiator_email,
            recipient_email: self.recipient_email,
            approvers: self.approvers,
            status: ApprovalStatus::Pending,
            access_level: self.access_level,
            shared_with_app: self.shared_with_app,
            source_app: self.source_app,
            created_at: now,
            expires_at: now + Duration::days(APPROVAL_TTL_DAYS),
            resolved_at: None,
            share_id: None,
        }
    }
}
