//! # General Route Handlers
//!
//! The root, health check and fallback handlers.

use super::AppError;
use axum::{http::Uri, Json};
use serde_json::{json, Value};

/// The handler for the root (`/`) endpoint.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "FUNR Backend API is running!" }))
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Answers unknown routes with the standard error record.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
