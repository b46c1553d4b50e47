//! Public link handlers.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::dto::request::OpenLinkBody;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/links/open
pub async fn open_link(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<OpenLinkBody>,
) -> Result<Json<Value>, ApiError> {
    let access = state
        .share_service
        .open_link(&auth, &req.slug, req.password.as_deref())
        .await?;
    Ok(Json(json!({
        "success": true,
        "share_id": access.share_id,
        "document_id": access.document_id,
        "access_level": access.access_level,
    })))
}
