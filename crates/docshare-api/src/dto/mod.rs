//! Request and response bodies.

pub mod request;
pub mod response;

use validator::Validate;

use docshare_core::error::AppError;

/// Run derive-based validation on a request body.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}
