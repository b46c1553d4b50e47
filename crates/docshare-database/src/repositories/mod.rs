//! PostgreSQL implementations of the store traits.

pub mod approval;
pub mod audit;
pub mod comment;
pub mod document;
pub mod notification;
pub mod share;

pub use approval::ApprovalRepository;
pub use audit::AuditLogRepository;
pub use comment::CommentRepository;
pub use document::DocumentRepository;
pub use notification::NotificationRepository;
pub use share::ShareRepository;

use docshare_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error, surfacing unique violations as `Conflict`.
pub(crate) fn map_db_error(
    context: &'static str,
    conflict: &'static str,
) -> impl Fn(sqlx::Error) -> AppError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::with_source(ErrorKind::Conflict, conflict, e)
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}
