//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use docshare_core::types::{CommentId, ShareId, WorkflowId};
use docshare_service::share::ImportRecord;

/// Create share request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShareBody {
    /// Document to share.
    #[validate(length(min = 1, message = "document_id is required"))]
    pub document_id: String,
    /// Recipient email.
    #[validate(email(message = "shared_with_email must be a valid email"))]
    pub shared_with_email: String,
    /// `view`, `download` or `edit`.
    pub access_level: String,
    /// Days until expiry.
    #[validate(range(min = 1, message = "expires_days must be at least 1"))]
    pub expires_days: Option<i64>,
    /// Link password.
    pub password: Option<String>,
    /// Public slug.
    pub custom_slug: Option<String>,
    /// Consuming-app restriction.
    pub shared_with_app: Option<String>,
    /// Count downloads.
    #[serde(default)]
    pub track_downloads: bool,
}

/// Body naming a single share.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShareIdBody {
    /// Share ID.
    pub share_id: ShareId,
}

/// Bulk import body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportSharesBody {
    /// Rows to import.
    #[serde(alias = "records")]
    pub shares_data: Vec<ImportRecord>,
}

/// Open a public link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpenLinkBody {
    /// Slug from `/d/{slug}`.
    #[validate(length(min = 1, message = "slug is required"))]
    pub slug: String,
    /// Link password, if the link has one.
    pub password: Option<String>,
}

/// Same-app access check.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckAccessBody {
    /// Document to check.
    #[validate(length(min = 1, message = "document_id is required"))]
    pub document_id: String,
}

/// Cross-app access check.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckCrossAppBody {
    /// Document to check.
    #[validate(length(min = 1, message = "document_id is required"))]
    pub document_id: String,
    /// App the grant must have been created from.
    #[validate(length(min = 1, message = "source_app is required"))]
    pub source_app: String,
    /// App asking for access.
    #[validate(length(min = 1, message = "target_app is required"))]
    pub target_app: String,
}

/// Start an approval workflow.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InitiateApprovalBody {
    /// Document to share once approved.
    #[validate(length(min = 1, message = "document_id is required"))]
    pub document_id: String,
    /// Recipient of the eventual grant.
    #[validate(email(message = "recipient_email must be a valid email"))]
    pub recipient_email: String,
    /// Approver emails.
    pub approvers: Vec<String>,
    /// `view`, `download` or `edit`.
    pub access_level: String,
    /// Consuming-app restriction of the eventual grant.
    pub shared_with_app: Option<String>,
}

/// Cast an approval vote.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecideApprovalBody {
    /// Workflow ID.
    pub workflow_id: WorkflowId,
    /// Approve (true) or reject (false).
    pub approved: bool,
    /// Optional note.
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Leave a comment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentBody {
    /// Commented document.
    #[validate(length(min = 1, message = "document_id is required"))]
    pub document_id: String,
    /// Text.
    pub body: String,
}

/// Moderate a comment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ModerateCommentBody {
    /// Comment ID.
    pub comment_id: CommentId,
    /// Approve (default) or reject.
    #[serde(default = "default_approved")]
    pub approved: bool,
}

fn default_approved() -> bool {
    true
}
