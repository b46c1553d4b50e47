//! In-memory audit log.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use docshare_core::result::AppResult;
use docshare_entity::audit::{AuditLogEntry, NewAuditLogEntry};

use crate::store::AuditStore;

/// Append-only vector of entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditStore {
    entries: Arc<RwLock<Vec<AuditLogEntry>>>,
}

impl MemoryAuditStore {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry in insertion order.
    pub async fn all(&self) -> Vec<AuditLogEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn insert(&self, data: NewAuditLogEntry) -> AppResult<AuditLogEntry> {
        let entry = data.into_entry(Utc::now());
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn list_for_resource(&self, resource_id: &str) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.resource_id == resource_id)
            .cloned()
            .collect())
    }
}
