//! Access evaluation over HTTP.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use docshare_auth::Role;
use docshare_core::types::ShareId;

use helpers::{DOC, OWNER, TENANT, TestApp};

async fn set_expiry(app: &TestApp, share_id: &str, days_from_now: i64) {
    let id: ShareId = share_id.parse().unwrap();
    assert!(
        app.shares
            .set_expires_at(id, Some(Utc::now() + Duration::days(days_from_now)))
            .await
    );
}

#[tokio::test]
async fn test_owner_and_not_shared() {
    let app = TestApp::new().await;

    let owner = app
        .post("/api/access/check", json!({ "document_id": DOC }), Some(&app.token(OWNER)))
        .await;
    assert_eq!(owner.status, StatusCode::OK);
    assert_eq!(owner.body["has_access"], true);
    assert_eq!(owner.body["access_level"], "owner");
    assert_eq!(owner.body["reason"], "owner");

    let stranger = app
        .post("/api/access/check", json!({ "document_id": DOC }), Some(&app.token(TENANT)))
        .await;
    assert_eq!(stranger.body["has_access"], false);
    assert_eq!(stranger.body["reason"], "not_shared");
}

#[tokio::test]
async fn test_expired_grant_reports_share_expired_regardless_of_level() {
    let app = TestApp::new().await;
    let share_id = app
        .create_share(json!({
            "document_id": DOC,
            "shared_with_email": TENANT,
            "access_level": "edit",
        }))
        .await;
    set_expiry(&app, &share_id, -1).await;

    let response = app
        .post("/api/access/check", json!({ "document_id": DOC }), Some(&app.token(TENANT)))
        .await;
    assert_eq!(response.body["has_access"], false);
    assert_eq!(response.body["reason"], "share_expired");
}

#[tokio::test]
async fn test_download_then_expiry() {
    let app = TestApp::new().await;
    let share_id = app
        .create_share(json!({
            "document_id": DOC,
            "shared_with_email": TENANT,
            "access_level": "download",
            "expires_days": 7,
            "track_downloads": true,
        }))
        .await;
    let token = app.token(TENANT);

    let check = app
        .post("/api/access/check", json!({ "document_id": DOC }), Some(&token))
        .await;
    assert_eq!(check.body["access_level"], "download");

    let download = app
        .post("/api/shares/download", json!({ "share_id": share_id }), Some(&token))
        .await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.body["download_count"], 1);

    set_expiry(&app, &share_id, -1).await;

    let check = app
        .post("/api/access/check", json!({ "document_id": DOC }), Some(&token))
        .await;
    assert_eq!(check.body["has_access"], false);
    assert_eq!(check.body["reason"], "share_expired");

    let download = app
        .post("/api/shares/download", json!({ "share_id": share_id }), Some(&token))
        .await;
    assert_eq!(download.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cross_app_pinning() {
    let app = TestApp::new().await;
    app.create_share(json!({
        "document_id": DOC,
        "shared_with_email": TENANT,
        "access_level": "view",
        "expires_days": 3,
        "shared_with_app": "mieter-app",
    }))
    .await;
    let token = app.token_for(TENANT, Role::Member, "mieter-app");

    let allowed = app
        .post(
            "/api/access/check-cross-app",
            json!({ "document_id": DOC, "source_app": "fintutto", "target_app": "mieter-app" }),
            Some(&token),
        )
        .await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.body["has_access"], true);
    assert_eq!(allowed.body["reason"], "shared");
    assert!(allowed.body["expires_at"].is_string());

    let other_app = app
        .post(
            "/api/access/check-cross-app",
            json!({ "document_id": DOC, "source_app": "fintutto", "target_app": "hausmeister-app" }),
            Some(&token),
        )
        .await;
    assert_eq!(other_app.body["has_access"], false);
    assert_eq!(other_app.body["reason"], "app_not_authorized");

    let other_source = app
        .post(
            "/api/access/check-cross-app",
            json!({ "document_id": DOC, "source_app": "vermieter-app", "target_app": "mieter-app" }),
            Some(&token),
        )
        .await;
    assert_eq!(other_source.body["reason"], "not_shared");
}

#[tokio::test]
async fn test_missing_document_id_is_rejected() {
    let app = TestApp::new().await;
    let response = app
        .post("/api/access/check", json!({ "document_id": "" }), Some(&app.token(TENANT)))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_omitted_document_id_is_rejected() {
    let app = TestApp::new().await;
    let token = app.token(TENANT);

    let response = app.post("/api/access/check", json!({}), Some(&token)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "INVALID_ARGUMENT");
    assert!(response.body["error"].as_str().unwrap().contains("document_id"));

    let cross = app
        .post(
            "/api/access/check-cross-app",
            json!({ "document_id": DOC, "source_app": "fintutto" }),
            Some(&token),
        )
        .await;
    assert_eq!(cross.status, StatusCode::BAD_REQUEST);
    assert!(cross.body["error"].as_str().unwrap().contains("target_app"));
}
