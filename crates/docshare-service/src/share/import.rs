//! Bulk share import.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use docshare_core::error::AppError;
use docshare_entity::share::AccessLevel;

use super::service::{CreateShareRequest, ShareOptions, ShareService};
use crate::context::RequestContext;

/// One row of a bulk import. Every field is optional so that a malformed
/// row is reported instead of rejecting the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRecord {
    /// Document to share.
    pub document_id: Option<String>,
    /// Recipient email.
    pub shared_with_email: Option<String>,
    /// `view`, `download` or `edit`.
    pub access_level: Option<String>,
    /// Days until expiry.
    pub expires_days: Option<i64>,
    /// Public slug.
    pub custom_slug: Option<String>,
    /// Link password.
    pub password: Option<String>,
    /// Consuming-app restriction.
    pub shared_with_app: Option<String>,
    /// Count downloads.
    #[serde(default)]
    pub track_downloads: bool,
}

impl ImportRecord {
    fn into_request(self) -> Result<CreateShareRequest, AppError> {
        let access_level = self
            .access_level
            .as_deref()
            .ok_or_else(|| AppError::validation("access_level is required"))?
            .parse::<AccessLevel>()?;

        Ok(CreateShareRequest {
            document_id: self
                .document_id
                .ok_or_else(|| AppError::validation("document_id is required"))?,
            shared_with_email: self
                .shared_with_email
                .ok_or_else(|| AppError::validation("shared_with_email is required"))?,
            access_level,
            options: ShareOptions {
                expires_days: self.expires_days,
                password: self.password,
                custom_slug: self.custom_slug,
                shared_with_app: self.shared_with_app,
                track_downloads: self.track_downloads,
            },
        })
    }
}

/// Per-batch outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// True when every row was created.
    pub success: bool,
    /// Rows created.
    pub success_count: usize,
    /// Rows rejected.
    pub failed_count: usize,
    /// `Row N: message`, 1-based.
    pub errors: Vec<String>,
}

impl ShareService {
    /// Create a grant per record. Rows are independent: a failure is
    /// reported and the batch continues.
    pub async fn bulk_import(
        &self,
        ctx: &RequestContext,
        records: Vec<ImportRecord>,
    ) -> Result<ImportReport, AppError> {
        if records.is_empty() {
            return Err(AppError::validation("No records to import"));
        }

        let total = records.len();
        let mut success_count = 0;
        let mut errors = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            let row = index + 1;
            let result = match record.into_request() {
                Ok(req) => self.create_share(ctx, req).await.map(|_| ()),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => success_count += 1,
                Err(e) => {
                    warn!(row, error = %e, "Import row rejected");
                    errors.push(format!("Row {row}: {}", e.message));
                }
            }
        }

        info!(
            imported_by = %ctx.email(),
            total,
            success_count,
            failed_count = errors.len(),
            "Bulk import finished"
        );

        Ok(ImportReport {
            success: errors.is_empty(),
            success_count,
            failed_count: errors.len(),
            errors,
        })
    }
}
