//! Share registry handlers.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use docshare_entity::share::AccessLevel;
use docshare_service::share::{CreateShareRequest, ShareExport, ShareOptions, ShareStats};

use crate::dto::request::{CreateShareBody, ImportSharesBody, ShareIdBody};
use crate::dto::response::CreateShareResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/shares/create
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateShareBody>,
) -> Result<Json<CreateShareResponse>, ApiError> {
    let access_level: AccessLevel = req.access_level.parse()?;

    let created = state
        .share_service
        .create_share(
            &auth,
            CreateShareRequest {
                document_id: req.document_id,
                shared_with_email: req.shared_with_email,
                access_level,
                options: ShareOptions {
                    expires_days: req.expires_days,
                    password: req.password,
                    custom_slug: req.custom_slug,
                    shared_with_app: req.shared_with_app,
                    track_downloads: req.track_downloads,
                },
            },
        )
        .await?;

    Ok(Json(CreateShareResponse {
        success: true,
        share_id: created.share_id,
        share_link: created.share_link,
    }))
}

/// POST /api/shares/revoke
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ShareIdBody>,
) -> Result<Json<Value>, ApiError> {
    let revoked = state.share_service.revoke_share(&auth, req.share_id).await?;
    let message = if revoked {
        "Share revoked"
    } else {
        "Share was already revoked"
    };
    Ok(Json(json!({ "success": true, "message": message })))
}

/// POST /api/shares/purge
pub async fn purge_share(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ShareIdBody>,
) -> Result<Json<Value>, ApiError> {
    state.share_service.purge_share(&auth, req.share_id).await?;
    Ok(Json(json!({ "success": true, "message": "Share deleted" })))
}

/// POST /api/shares/list
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let shares = state.share_service.list_shares(&auth).await?;
    Ok(Json(json!({ "success": true, "shares": shares })))
}

/// POST /api/shares/received
pub async fn list_received(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let shares = state.share_service.list_received(&auth).await?;
    Ok(Json(json!({ "success": true, "shares": shares })))
}

/// POST /api/shares/stats
pub async fn share_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ShareStats>, ApiError> {
    Ok(Json(state.share_service.share_stats(&auth).await?))
}

/// POST /api/shares/import
pub async fn bulk_import(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ImportSharesBody>,
) -> Result<Json<Value>, ApiError> {
    let report = state.share_service.bulk_import(&auth, req.shares_data).await?;
    Ok(Json(json!({
        "success": report.success,
        "success_count": report.success_count,
        "failed_count": report.failed_count,
        "errors": report.errors,
    })))
}

/// POST /api/shares/export
pub async fn bulk_export(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ShareExport>, ApiError> {
    Ok(Json(state.share_service.bulk_export(&auth).await?))
}

/// POST /api/shares/download
pub async fn record_download(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ShareIdBody>,
) -> Result<Json<Value>, ApiError> {
    let download_count = state
        .share_service
        .record_download(&auth, req.share_id)
        .await?;
    Ok(Json(json!({ "success": true, "download_count": download_count })))
}
