//! Audit action and resource-type names.

/// Share grant created.
pub const SHARE_CREATED: &str = "share.created";
/// Share grant revoked.
pub const SHARE_REVOKED: &str = "share.revoked";
/// Share grant hard-deleted by its owner.
pub const SHARE_PURGED: &str = "share.purged";
/// Public link opened.
pub const SHARE_LINK_OPENED: &str = "share.link_opened";
/// Download recorded.
pub const SHARE_DOWNLOADED: &str = "share.downloaded";

/// Workflow started.
pub const APPROVAL_INITIATED: &str = "approval.initiated";
/// Single approval recorded, others outstanding.
pub const APPROVAL_DECISION: &str = "approval.decision";
/// Workflow fully approved.
pub const APPROVAL_APPROVED: &str = "approval.approved";
/// Workflow rejected.
pub const APPROVAL_REJECTED: &str = "approval.rejected";
/// Workflow lapsed.
pub const APPROVAL_EXPIRED: &str = "approval.expired";

/// Comment posted.
pub const COMMENT_CREATED: &str = "comment.created";
/// Comment moderated.
pub const COMMENT_MODERATED: &str = "comment.moderated";

/// Resource type for share grants.
pub const RESOURCE_SHARE: &str = "share";
/// Resource type for documents.
pub const RESOURCE_DOCUMENT: &str = "document";
/// Resource type for approval workflows.
pub const RESOURCE_APPROVAL: &str = "approval_workflow";
/// Resource type for comments.
pub const RESOURCE_COMMENT: &str = "share_comment";
