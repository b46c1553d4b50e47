//! Convenience result type alias for DocShare.

use crate::error::AppError;

/// A specialized `Result` type for DocShare operations.
pub type AppResult<T> = Result<T, AppError>;
