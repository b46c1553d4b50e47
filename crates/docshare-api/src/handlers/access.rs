//! Access check handlers.

use axum::Json;
use axum::extract::State;

use docshare_entity::share::AccessDecision;

use crate::dto::request::{CheckAccessBody, CheckCrossAppBody};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/access/check
pub async fn check_access(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CheckAccessBody>,
) -> Result<Json<AccessDecision>, ApiError> {
    let decision = state.access_service.check(&auth, &req.document_id).await?;
    Ok(Json(decision))
}

/// POST /api/access/check-cross-app
pub async fn check_access_cross_app(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CheckCrossAppBody>,
) -> Result<Json<AccessDecision>, ApiError> {
    let decision = state
        .access_service
        .check_cross_app(&auth, &req.document_id, &req.source_app, &req.target_app)
        .await?;
    Ok(Json(decision))
}
