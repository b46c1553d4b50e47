//! Share domain entities.

pub mod access;
pub mod decision;
pub mod model;

pub use access::AccessLevel;
pub use decision::{AccessDecision, AccessReason};
pub use model::{share_link_for_slug, GrantStatus, NewShareGrant, ShareGrant};
