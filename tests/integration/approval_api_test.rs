//! Approval workflows, comments, audit and health over HTTP.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::{ADMIN, DOC, OWNER, TENANT, TestApp};

const APPROVERS: [&str; 3] = ["a@example.com", "b@example.com", "c@example.com"];

async fn initiate(app: &TestApp) -> String {
    let response = app
        .post(
            "/api/approvals/initiate",
            json!({
                "document_id": DOC,
                "recipient_email": TENANT,
                "approvers": APPROVERS,
                "access_level": "download",
            }),
            Some(&app.admin_token(ADMIN)),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    response.body["workflow_id"].as_str().unwrap().to_string()
}

async fn decide(app: &TestApp, approver: &str, workflow_id: &str, approved: bool) -> Value {
    let response = app
        .post(
            "/api/approvals/decide",
            json!({ "workflow_id": workflow_id, "approved": approved }),
            Some(&app.token(approver)),
        )
        .await;
    json!({ "status": response.status.as_u16(), "body": response.body })
}

#[tokio::test]
async fn test_initiate_is_admin_only() {
    let app = TestApp::new().await;
    let response = app
        .post(
            "/api/approvals/initiate",
            json!({
                "document_id": DOC,
                "recipient_email": TENANT,
                "approvers": ["a@example.com"],
                "access_level": "view",
            }),
            Some(&app.token(OWNER)),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_three_approvals_create_one_grant() {
    let app = TestApp::new().await;
    let workflow_id = initiate(&app).await;

    let pending = app
        .post("/api/approvals/pending", json!({}), Some(&app.token(APPROVERS[0])))
        .await;
    assert_eq!(pending.body["workflows"].as_array().unwrap().len(), 1);

    let first = decide(&app, APPROVERS[0], &workflow_id, true).await;
    assert_eq!(first["body"]["status"], "pending");
    let repeat = decide(&app, APPROVERS[0], &workflow_id, true).await;
    assert_eq!(repeat["body"]["status"], "pending");
    decide(&app, APPROVERS[1], &workflow_id, true).await;
    assert!(app.shares.is_empty().await);

    let last = decide(&app, APPROVERS[2], &workflow_id, true).await;
    assert_eq!(last["status"], 200);
    assert_eq!(last["body"]["status"], "approved");
    assert!(last["body"]["share_id"].is_string());
    assert_eq!(app.shares.len().await, 1);

    let again = decide(&app, APPROVERS[2], &workflow_id, true).await;
    assert_eq!(again["status"], 409);
    assert_eq!(app.shares.len().await, 1);

    let access = app
        .post("/api/access/check", json!({ "document_id": DOC }), Some(&app.token(TENANT)))
        .await;
    assert_eq!(access.body["access_level"], "download");

    let fetched = app
        .get(&format!("/api/approvals/{workflow_id}"), Some(&app.token(TENANT)))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["workflow"]["status"], "approved");
}

#[tokio::test]
async fn test_rejection_and_outsiders() {
    let app = TestApp::new().await;
    let workflow_id = initiate(&app).await;

    let outsider = decide(&app, TENANT, &workflow_id, true).await;
    assert_eq!(outsider["status"], 403);

    let rejected = decide(&app, APPROVERS[1], &workflow_id, false).await;
    assert_eq!(rejected["body"]["status"], "rejected");
    assert!(app.shares.is_empty().await);

    let bad_id = app
        .get("/api/approvals/not-a-uuid", Some(&app.admin_token(ADMIN)))
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comment_and_moderation() {
    let app = TestApp::new().await;
    app.create_share(json!({
        "document_id": DOC,
        "shared_with_email": TENANT,
        "access_level": "view",
    }))
    .await;

    let created = app
        .post(
            "/api/comments/create",
            json!({ "document_id": DOC, "body": "Page 3 has a typo" }),
            Some(&app.token(TENANT)),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let comment_id = created.body["comment_id"].as_str().unwrap().to_string();

    let by_tenant = app
        .post(
            "/api/comments/approve",
            json!({ "comment_id": comment_id }),
            Some(&app.token(TENANT)),
        )
        .await;
    assert_eq!(by_tenant.status, StatusCode::FORBIDDEN);

    let by_owner = app
        .post(
            "/api/comments/approve",
            json!({ "comment_id": comment_id }),
            Some(&app.token(OWNER)),
        )
        .await;
    assert_eq!(by_owner.status, StatusCode::OK);
    assert_eq!(by_owner.body["status"], "approved");
}

#[tokio::test]
async fn test_audit_trail_is_admin_only() {
    let app = TestApp::new().await;
    let share_id = app
        .create_share(json!({
            "document_id": DOC,
            "shared_with_email": TENANT,
            "access_level": "view",
        }))
        .await;
    app.post(
        "/api/shares/revoke",
        json!({ "share_id": share_id }),
        Some(&app.token(OWNER)),
    )
    .await;

    let path = format!("/api/audit/{share_id}");
    let denied = app.get(&path, Some(&app.token(OWNER))).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let entries = app.get(&path, Some(&app.admin_token(ADMIN))).await;
    assert_eq!(entries.status, StatusCode::OK);
    let actions: Vec<&str> = entries.body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["share.revoked", "share.created"]);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.get("/api/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
