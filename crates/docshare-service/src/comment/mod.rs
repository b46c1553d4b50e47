//! Comments on shared documents, moderated by the owner.

pub mod service;

pub use service::{CommentService, MAX_COMMENT_LEN};
