//! In-memory store implementations guarded by `tokio::sync::RwLock`.
//!
//! Suitable for single-node deployments and tests. Each store keeps the
//! same invariants as its PostgreSQL counterpart by checking and writing
//! under one write lock.

pub mod approval;
pub mod audit;
pub mod comment;
pub mod document;
pub mod notification;
pub mod share;

pub use approval::MemoryApprovalStore;
pub use audit::MemoryAuditStore;
pub use comment::MemoryCommentStore;
pub use document::MemoryDocumentCatalog;
pub use notification::MemoryNotificationStore;
pub use share::MemoryShareStore;
