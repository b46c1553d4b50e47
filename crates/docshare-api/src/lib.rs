//! # docshare-api
//!
//! HTTP API layer for DocShare built on Axum.
//!
//! Provides the JSON endpoints under `/api`, the bearer-token extractor,
//! middleware (CORS, request logging, admin guard), DTOs and the mapping
//! from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
