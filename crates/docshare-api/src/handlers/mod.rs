//! Request handlers, grouped by domain.

pub mod access;
pub mod approval;
pub mod audit;
pub mod comment;
pub mod health;
pub mod link;
pub mod share;
