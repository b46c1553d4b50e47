//! Share registry over HTTP.

mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use docshare_core::config::AppConfig;
use docshare_service::notification::RetryPolicy;

use helpers::{ADMIN, DOC, HangingMail, OWNER, TENANT, TestApp};

fn share_body(email: &str, level: &str) -> serde_json::Value {
    json!({ "document_id": DOC, "shared_with_email": email, "access_level": level })
}

#[tokio::test]
async fn test_create_share_requires_bearer_token() {
    let app = TestApp::new().await;
    let response = app
        .post("/api/shares/create", share_body(TENANT, "view"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "UNAUTHENTICATED");

    let response = app
        .post("/api/shares/create", share_body(TENANT, "view"), Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_share_with_slug() {
    let app = TestApp::new().await;
    let token = app.token(OWNER);
    let response = app
        .post(
            "/api/shares/create",
            json!({
                "document_id": DOC,
                "shared_with_email": "Tenant@Example.com",
                "access_level": "download",
                "expires_days": 30,
                "custom_slug": "lease-2026",
            }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["share_link"], "/d/lease-2026");

    let sent = app.sent_mail().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].user_email, TENANT);
    assert_eq!(sent[0].event_type, "share.created");
}

#[tokio::test]
async fn test_create_share_error_mapping() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/api/shares/create",
            share_body(TENANT, "view"),
            Some(&app.token(TENANT)),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["code"], "FORBIDDEN");

    let response = app
        .post(
            "/api/shares/create",
            share_body(TENANT, "owner"),
            Some(&app.token(OWNER)),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "INVALID_ARGUMENT");
    assert!(response.body["error"].as_str().unwrap().contains("access level"));

    let response = app
        .post(
            "/api/shares/create",
            json!({ "document_id": "missing", "shared_with_email": TENANT, "access_level": "view" }),
            Some(&app.token(OWNER)),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let app = TestApp::new().await;
    let share_id = app.create_share(share_body(TENANT, "view")).await;
    let token = app.token(OWNER);

    for _ in 0..2 {
        let response = app
            .post("/api/shares/revoke", json!({ "share_id": share_id }), Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["success"], true);
    }

    let received = app
        .post("/api/shares/received", json!({}), Some(&app.token(TENANT)))
        .await;
    assert_eq!(received.body["shares"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_slug_is_unique_among_active_grants() {
    let app = TestApp::new().await;
    let mut body = share_body(TENANT, "view");
    body["custom_slug"] = json!("contract");
    let first = app.create_share(body.clone()).await;

    let token = app.token(OWNER);
    let response = app.post("/api/shares/create", body.clone(), Some(&token)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["code"], "CONFLICT");

    app.post("/api/shares/revoke", json!({ "share_id": first }), Some(&token))
        .await;
    let response = app.post("/api/shares/create", body, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_bulk_import_reports_each_bad_row() {
    let app = TestApp::new().await;
    let response = app
        .post(
            "/api/shares/import",
            json!({ "shares_data": [
                { "document_id": DOC, "shared_with_email": "a@example.com", "access_level": "view" },
                { "document_id": DOC, "shared_with_email": "broken", "access_level": "view" },
                { "document_id": DOC, "shared_with_email": "b@example.com", "access_level": "edit" },
                { "document_id": DOC, "shared_with_email": "c@example.com", "access_level": "view", "expires_days": 0 },
            ]}),
            Some(&app.token(OWNER)),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success_count"], 2);
    assert_eq!(response.body["failed_count"], 2);
    let errors = response.body["errors"].as_array().unwrap();
    assert!(errors[0].as_str().unwrap().starts_with("Row 2:"));
    assert!(errors[1].as_str().unwrap().starts_with("Row 4:"));

    let empty = app
        .post("/api/shares/import", json!({ "records": [] }), Some(&app.token(OWNER)))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let missing = app
        .post("/api/shares/import", json!({}), Some(&app.token(OWNER)))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["code"], "INVALID_ARGUMENT");
    assert!(missing.body["error"].as_str().unwrap().contains("shares_data"));
}

#[tokio::test]
async fn test_omitted_fields_are_invalid_arguments() {
    let app = TestApp::new().await;
    let token = app.token(OWNER);

    let no_level = app
        .post(
            "/api/shares/create",
            json!({ "document_id": DOC, "shared_with_email": TENANT }),
            Some(&token),
        )
        .await;
    assert_eq!(no_level.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_level.body["code"], "INVALID_ARGUMENT");
    assert!(no_level.body["error"].as_str().unwrap().contains("access_level"));

    let no_share = app.post("/api/shares/revoke", json!({}), Some(&token)).await;
    assert_eq!(no_share.status, StatusCode::BAD_REQUEST);

    let malformed = app
        .request("POST", "/api/shares/create", None, Some(&token))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert!(malformed.body["error"].is_string());
    assert!(app.shares.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_mail_does_not_hold_up_requests() {
    let policy = RetryPolicy::from_config(&AppConfig::default().notification);
    let app = TestApp::with_mail(policy, Arc::new(HangingMail)).await;

    let response = app
        .post(
            "/api/shares/import",
            json!({ "shares_data": [
                { "document_id": DOC, "shared_with_email": "a@example.com", "access_level": "view" },
                { "document_id": DOC, "shared_with_email": "b@example.com", "access_level": "view" },
            ]}),
            Some(&app.token(OWNER)),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["success_count"], 2);
    assert_eq!(app.shares.len().await, 2);

    let initiated = app
        .post(
            "/api/approvals/initiate",
            json!({
                "document_id": DOC,
                "recipient_email": TENANT,
                "approvers": ["a@example.com", "b@example.com", "c@example.com"],
                "access_level": "view",
            }),
            Some(&app.admin_token(ADMIN)),
        )
        .await;
    assert_eq!(initiated.status, StatusCode::OK, "{}", initiated.body);
    assert!(initiated.body["workflow_id"].is_string());

    // Background deliveries give up on their own.
    app.notifier.drain().await;
}

#[tokio::test]
async fn test_export_and_stats() {
    let app = TestApp::new().await;
    app.create_share(share_body(TENANT, "view")).await;
    let revoked = app.create_share(share_body("b@example.com", "edit")).await;
    let token = app.token(OWNER);
    app.post("/api/shares/revoke", json!({ "share_id": revoked }), Some(&token))
        .await;

    let export = app.post("/api/shares/export", json!({}), Some(&token)).await;
    assert_eq!(export.status, StatusCode::OK);
    assert_eq!(export.body["total"], 2);
    let csv = export.body["csv"].as_str().unwrap();
    assert!(csv.starts_with("document_id,recipient,access_level,created,expires,status\n"));
    assert!(csv.contains(",revoked\n"));
    assert!(csv.contains(",active\n"));

    let stats = app.post("/api/shares/stats", json!({}), Some(&token)).await;
    assert_eq!(stats.body["total_shares"], 2);
    assert_eq!(stats.body["active_shares"], 1);
    assert_eq!(stats.body["revoked_shares"], 1);
    assert_eq!(stats.body["by_access_level"]["edit"], 1);
    assert_eq!(stats.body["total_recipients"], 2);
}

#[tokio::test]
async fn test_open_password_protected_link() {
    let app = TestApp::new().await;
    let mut body = share_body(TENANT, "view");
    body["custom_slug"] = json!("private-doc");
    body["password"] = json!("open-sesame");
    app.create_share(body).await;

    let visitor = app.token("visitor@example.com");
    let wrong = app
        .post(
            "/api/links/open",
            json!({ "slug": "private-doc", "password": "nope" }),
            Some(&visitor),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let ok = app
        .post(
            "/api/links/open",
            json!({ "slug": "private-doc", "password": "open-sesame" }),
            Some(&visitor),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["document_id"], DOC);
    assert_eq!(ok.body["access_level"], "view");
}

#[tokio::test]
async fn test_purge_removes_grant() {
    let app = TestApp::new().await;
    let share_id = app.create_share(share_body(TENANT, "view")).await;

    let denied = app
        .post("/api/shares/purge", json!({ "share_id": share_id }), Some(&app.token(TENANT)))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let purged = app
        .post("/api/shares/purge", json!({ "share_id": share_id }), Some(&app.token(OWNER)))
        .await;
    assert_eq!(purged.status, StatusCode::OK);

    let listed = app
        .post("/api/shares/list", json!({}), Some(&app.token(OWNER)))
        .await;
    assert!(listed.body["shares"].as_array().unwrap().is_empty());
}
