//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docshare_core::types::AuditLogId;

/// Outcome recorded with an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    /// The action completed.
    Success,
    /// The action was attempted and refused.
    Failure,
}

/// An immutable audit log entry recording a sensitive action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: AuditLogId,
    /// Email of the acting identity.
    pub actor_email: String,
    /// The action that was performed (e.g., `"share.created"`).
    pub action: String,
    /// The type of target resource (e.g., `"share"`, `"approval_workflow"`).
    pub resource_type: String,
    /// Target resource identifier.
    pub resource_id: String,
    /// What changed (JSON).
    pub changes: Option<serde_json::Value>,
    /// IP address of the actor.
    pub ip_address: Option<String>,
    /// User-Agent of the actor.
    pub user_agent: Option<String>,
    /// Outcome.
    pub status: AuditStatus,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditLogEntry {
    /// Acting identity.
    pub actor_email: String,
    /// Action performed.
    pub action: String,
    /// Target resource type.
    pub resource_type: String,
    /// Target resource identifier.
    pub resource_id: String,
    /// What changed.
    pub changes: Option<serde_json::Value>,
    /// Actor's IP address.
    pub ip_address: Option<String>,
    /// Actor's User-Agent.
    pub user_agent: Option<String>,
    /// Outcome.
    pub status: AuditStatus,
}

impl NewAuditLogEntry {
    /// Materialize the entry with a fresh id at `now`.
    pub fn into_entry(self, now: DateTime<Utc>) -> AuditLogEntry {
        AuditLogEntry {
            id: AuditLogId::new(),
            actor_email: self.actor_email,
            action: self.action,
            resource_type: self.resource_type,
            resource_id: self.resource_id,
            changes: self.changes,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            status: self.status,
            created_at: now,
        }
    }
}
