//! Liveness, welcome, and fallback endpoints.

use crate::error::ApiError;
use axum::http::Uri;
use axum::Json;
use serde::Serialize;

/// Liveness payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// RFC 3339 UTC.
    pub timestamp: String,
}

/// Welcome document listing the top-level endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct WelcomeResponse {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub classes: &'static str,
    pub students: &'static str,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running!".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        success: true,
        message: "Welcome to Student Class Management API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: Endpoints {
            health: "/health",
            classes: "/api/classes",
            students: "/api/students",
        },
    })
}

/// Any unmatched path.
pub async fn route_not_found(uri: Uri) -> ApiError {
    let path = uri
        .path_and_query()
        .map(|value| value.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    ApiError::RouteNotFound(path)
}
