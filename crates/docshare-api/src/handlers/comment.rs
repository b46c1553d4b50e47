//! Share comment handlers.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::dto::request::{CreateCommentBody, ModerateCommentBody};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/comments/create
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateCommentBody>,
) -> Result<Json<Value>, ApiError> {
    let comment = state
        .comment_service
        .create(&auth, &req.document_id, &req.body)
        .await?;
    Ok(Json(json!({ "success": true, "comment_id": comment.id })))
}

/// POST /api/comments/approve
pub async fn moderate_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ModerateCommentBody>,
) -> Result<Json<Value>, ApiError> {
    let comment = state
        .comment_service
        .moderate(&auth, req.comment_id, req.approved)
        .await?;
    Ok(Json(json!({ "success": true, "status": comment.status })))
}
