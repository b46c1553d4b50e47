//! Multi-party approval before a grant is created.

pub mod service;

pub use service::{ApprovalService, DecisionOutcome, InitiateApprovalRequest};
