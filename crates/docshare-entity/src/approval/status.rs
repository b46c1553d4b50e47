//! Approval workflow status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "approval_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Waiting for approver decisions.
    Pending,
    /// Every approver approved; the share was created.
    Approved,
    /// An approver rejected.
    Rejected,
    /// Not decided within the approval window.
    Expired,
}

impl ApprovalStatus {
    /// Terminal states never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only pending workflows may move, and only to a terminal state.
    pub fn can_transition_to(&self, next: ApprovalStatus) -> bool {
        matches!(self, Self::Pending) && next.is_terminal()
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
