//! JSON body extractor that answers bad input with 400.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use docshare_core::error::AppError;

use crate::dto::validate_body;
use crate::error::ApiError;

/// Deserializes a JSON body and runs its `validator` rules.
///
/// Malformed JSON, a missing field or a wrong content type all become an
/// `INVALID_ARGUMENT` error body.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection_message(&rejection)))?;
        validate_body(&body)?;
        Ok(Self(body))
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        other => other.body_text(),
    }
}
