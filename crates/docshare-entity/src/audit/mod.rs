//! Audit trail entities.

pub mod action;
pub mod model;

pub use model::{AuditLogEntry, AuditStatus, NewAuditLogEntry};
