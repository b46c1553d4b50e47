//! Append-only audit trail.

pub mod service;

pub use service::AuditService;
