//! Approval workflow entities.

pub mod model;
pub mod status;

pub use model::{ApprovalWorkflow, ApproverDecision, NewApprovalWorkflow, APPROVAL_TTL_DAYS};
pub use status::ApprovalStatus;
