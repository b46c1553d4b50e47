//! Response DTOs.

use serde::{Deserialize, Serialize};

use docshare_core::types::ShareId;

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Result of creating a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareResponse {
    /// Always true.
    pub success: bool,
    /// New grant.
    pub share_id: ShareId,
    /// `/d/{slug}` or null.
    pub share_link: Option<String>,
}
