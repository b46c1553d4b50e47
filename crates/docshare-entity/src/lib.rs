//! # docshare-entity
//!
//! Domain entity models for DocShare. Every struct in this crate
//! represents a database table row or a domain value object. Table rows
//! additionally derive `sqlx::FromRow`.

pub mod approval;
pub mod audit;
pub mod comment;
pub mod document;
pub mod notification;
pub mod share;
