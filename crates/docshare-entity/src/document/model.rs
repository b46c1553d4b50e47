//! Catalogue view of a document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The slice of a hosted document this service needs: who owns it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRecord {
    /// Platform document key.
    pub id: String,
    /// Owner email (lower-cased).
    pub owner_email: String,
    /// Display title.
    pub title: String,
    /// App the document lives in.
    pub source_app: String,
    /// When the document was registered.
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Whether `email` owns this document.
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.owner_email.eq_ignore_ascii_case(email)
    }
}
