//! Route definitions for the DocShare HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;
    let body_limit = server.body_limit_bytes;
    let timeout = Duration::from_secs(server.request_timeout_seconds);
    let cors = middleware::cors::build_cors_layer(&server.cors);

    let api_routes = Router::new()
        .merge(share_routes())
        .merge(link_routes())
        .merge(access_routes())
        .merge(approval_routes())
        .merge(comment_routes())
        .merge(audit_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Share registry
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/shares/create", post(handlers::share::create_share))
        .route("/shares/revoke", post(handlers::share::revoke_share))
        .route("/shares/purge", post(handlers::share::purge_share))
        .route("/shares/list", post(handlers::share::list_shares))
        .route("/shares/received", post(handlers::share::list_received))
        .route("/shares/stats", post(handlers::share::share_stats))
        .route("/shares/import", post(handlers::share::bulk_import))
        .route("/shares/export", post(handlers::share::bulk_export))
        .route("/shares/download", post(handlers::share::record_download))
}

/// Public links
fn link_routes() -> Router<AppState> {
    Router::new().route("/links/open", post(handlers::link::open_link))
}

/// Access evaluation
fn access_routes() -> Router<AppState> {
    Router::new()
        .route("/access/check", post(handlers::access::check_access))
        .route(
            "/access/check-cross-app",
            post(handlers::access::check_access_cross_app),
        )
}

/// Approval workflows
fn approval_routes() -> Router<AppState> {
    Router::new()
        .route("/approvals/initiate", post(handlers::approval::initiate))
        .route("/approvals/decide", post(handlers::approval::decide))
        .route("/approvals/pending", post(handlers::approval::pending))
        .route("/approvals/{id}", get(handlers::approval::get_approval))
}

/// Comments
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments/create", post(handlers::comment::create_comment))
        .route("/comments/approve", post(handlers::comment::moderate_comment))
}

/// Audit trail (admin)
fn audit_routes() -> Router<AppState> {
    Router::new().route("/audit/{resource_id}", get(handlers::audit::for_resource))
}

/// Health
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
