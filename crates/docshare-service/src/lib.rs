//! # docshare-service
//!
//! Business logic for DocShare. Each service orchestrates the stores,
//! the password hasher and the side-effect collaborators to implement one
//! group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. Audit and notification are
//! leaf collaborators; the share registry is the core; access evaluation
//! reads from it and the approval workflow writes through it.

pub mod access;
pub mod approval;
pub mod audit;
pub mod comment;
pub mod context;
pub mod notification;
pub mod share;
pub mod validation;

#[cfg(test)]
mod testing;

pub use access::AccessService;
pub use approval::ApprovalService;
pub use audit::AuditService;
pub use comment::CommentService;
pub use context::RequestContext;
pub use notification::{NotificationChannel, NotificationDispatcher};
pub use share::ShareService;
