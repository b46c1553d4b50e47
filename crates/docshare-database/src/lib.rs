//! # docshare-database
//!
//! Store traits for every DocShare table, with PostgreSQL repository
//! implementations and in-memory implementations selected by
//! `database.provider`.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{
    ApprovalStore, AuditStore, CommentStore, DocumentCatalog, NotificationStore, ShareStore,
    Stores,
};
