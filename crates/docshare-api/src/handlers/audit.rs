//! Audit trail handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/audit/{resource_id}
pub async fn for_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(resource_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&auth)?;
    let entries = state.audit_service.for_resource(&auth, &resource_id).await?;
    Ok(Json(json!({ "success": true, "entries": entries })))
}
