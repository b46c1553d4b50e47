//! Share comment entities.

pub mod model;

pub use model::{CommentStatus, NewShareComment, ShareComment};
