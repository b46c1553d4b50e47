//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::AuthUser;
pub use json::ValidJson;
