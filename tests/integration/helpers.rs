//! Shared test helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use docshare_api::{AppState, build_app};
use docshare_auth::{JwtEncoder, Role};
use docshare_core::config::AppConfig;
use docshare_core::result::AppResult;
use docshare_database::memory::{
    MemoryApprovalStore, MemoryAuditStore, MemoryCommentStore, MemoryDocumentCatalog,
    MemoryNotificationStore, MemoryShareStore,
};
use docshare_database::{DocumentCatalog, Stores};
use docshare_entity::document::DocumentRecord;
use docshare_entity::notification::{ChannelKind, NotificationEvent};
use docshare_service::notification::{InAppChannel, RetryPolicy};
use docshare_service::{NotificationChannel, NotificationDispatcher};

pub const OWNER: &str = "owner@example.com";
pub const TENANT: &str = "tenant@example.com";
pub const ADMIN: &str = "admin@example.com";
pub const APP: &str = "fintutto";
pub const DOC: &str = "doc-1";

/// Email channel stand-in that remembers what it was asked to send.
#[derive(Default)]
pub struct RecordingChannel {
    pub sent: Mutex<Vec<NotificationEvent>>,
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn deliver(&self, event: &NotificationEvent) -> AppResult<()> {
        self.sent.lock().await.push(event.clone());
        Ok(())
    }
}

/// Email channel stand-in that never answers.
pub struct HangingMail;

#[async_trait]
impl NotificationChannel for HangingMail {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn deliver(&self, _event: &NotificationEvent) -> AppResult<()> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Concrete share store, for moving expiries
    pub shares: Arc<MemoryShareStore>,
    /// Concrete approval store
    pub approvals: Arc<MemoryApprovalStore>,
    /// Document catalogue
    pub documents: Arc<MemoryDocumentCatalog>,
    /// Token issuer
    pub encoder: JwtEncoder,
    /// Captured email notifications
    pub outbox: Arc<RecordingChannel>,
    /// Dispatcher, for waiting on background delivery
    pub notifier: Arc<NotificationDispatcher>,
}

/// Response status and decoded JSON body
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application over in-memory stores, with `doc-1`
    /// owned by [`OWNER`].
    pub async fn new() -> Self {
        let outbox = Arc::new(RecordingChannel::default());
        let policy = RetryPolicy {
            timeout: Duration::from_millis(500),
            max_retries: 0,
            initial_backoff: Duration::from_millis(1),
        };
        Self::build(policy, outbox.clone(), outbox).await
    }

    /// Application whose email channel is `mail`, retried per `policy`.
    pub async fn with_mail(policy: RetryPolicy, mail: Arc<dyn NotificationChannel>) -> Self {
        Self::build(policy, mail, Arc::new(RecordingChannel::default())).await
    }

    async fn build(
        policy: RetryPolicy,
        mail: Arc<dyn NotificationChannel>,
        outbox: Arc<RecordingChannel>,
    ) -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret-0123456789".to_string();

        let documents = Arc::new(MemoryDocumentCatalog::new());
        let shares = Arc::new(MemoryShareStore::new());
        let approvals = Arc::new(MemoryApprovalStore::new());
        let notifications = Arc::new(MemoryNotificationStore::new());
        let stores = Stores {
            documents: documents.clone(),
            shares: shares.clone(),
            approvals: approvals.clone(),
            audit: Arc::new(MemoryAuditStore::new()),
            comments: Arc::new(MemoryCommentStore::new()),
            notifications: notifications.clone(),
        };

        let notifier = Arc::new(
            NotificationDispatcher::new(policy, vec![ChannelKind::InApp, ChannelKind::Email])
                .with_channel(Arc::new(InAppChannel::new(notifications)))
                .with_channel(mail),
        );

        let encoder = JwtEncoder::new(&config.auth);
        let router = build_app(AppState::with_notifier(config, stores, notifier.clone()));

        let app = Self {
            router,
            shares,
            approvals,
            documents,
            encoder,
            outbox,
            notifier,
        };
        app.add_document(DOC, OWNER).await;
        app
    }

    /// Register a document in the catalogue.
    pub async fn add_document(&self, id: &str, owner: &str) {
        self.documents
            .upsert_document(&DocumentRecord {
                id: id.to_string(),
                owner_email: owner.to_string(),
                title: format!("Document {id}"),
                source_app: APP.to_string(),
                created_at: Utc::now(),
            })
            .await
            .expect("Failed to register document");
    }

    /// Email events sent so far, once background delivery settles.
    pub async fn sent_mail(&self) -> Vec<NotificationEvent> {
        self.notifier.drain().await;
        self.outbox.sent.lock().await.clone()
    }

    /// Member token acting from the default app.
    pub fn token(&self, email: &str) -> String {
        self.token_for(email, Role::Member, APP)
    }

    /// Admin token acting from the default app.
    pub fn admin_token(&self, email: &str) -> String {
        self.token_for(email, Role::Admin, APP)
    }

    /// Token with an explicit role and app.
    pub fn token_for(&self, email: &str, role: Role, app: &str) -> String {
        self.encoder
            .issue(email, role, Some(app))
            .expect("Failed to issue token")
    }

    /// POST a JSON body.
    pub async fn post(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request("POST", path, Some(body), token).await
    }

    /// GET a path.
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request("GET", path, None, token).await
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create a share as [`OWNER`] and return its id.
    pub async fn create_share(&self, body: Value) -> String {
        let token = self.token(OWNER);
        let response = self.post("/api/shares/create", body, Some(&token)).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["share_id"]
            .as_str()
            .expect("share_id missing")
            .to_string()
    }
}
