//! Approval workflow handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use docshare_core::error::AppError;
use docshare_core::types::WorkflowId;
use docshare_entity::share::AccessLevel;
use docshare_service::approval::InitiateApprovalRequest;

use crate::dto::request::{DecideApprovalBody, InitiateApprovalBody};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/approvals/initiate
pub async fn initiate(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<InitiateApprovalBody>,
) -> Result<Json<Value>, ApiError> {
    let access_level: AccessLevel = req.access_level.parse()?;

    let workflow = state
        .approval_service
        .initiate(
            &auth,
            InitiateApprovalRequest {
                document_id: req.document_id,
                recipient_email: req.recipient_email,
                approvers: req.approvers,
                access_level,
                shared_with_app: req.shared_with_app,
            },
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "workflow_id": workflow.id,
        "expires_at": workflow.expires_at,
    })))
}

/// POST /api/approvals/decide
pub async fn decide(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<DecideApprovalBody>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .approval_service
        .decide(&auth, req.workflow_id, req.approved, req.comment)
        .await?;

    let mut body = json!({ "success": true, "status": outcome.status });
    if let Some(share_id) = outcome.share_id {
        body["share_id"] = json!(share_id);
    }
    Ok(Json(body))
}

/// GET /api/approvals/{id}
pub async fn get_approval(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let workflow_id: WorkflowId = id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid workflow id: '{id}'")))?;
    let workflow = state.approval_service.get(&auth, workflow_id).await?;
    Ok(Json(json!({ "success": true, "workflow": workflow })))
}

/// POST /api/approvals/pending
pub async fn pending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let workflows = state.approval_service.pending_for(&auth).await?;
    Ok(Json(json!({ "success": true, "workflows": workflows })))
}
