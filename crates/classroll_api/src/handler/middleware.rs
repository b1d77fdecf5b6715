//! Request logging middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;

/// Logs one `http_request` event per request with method, path, status and
/// duration. Query strings are not logged.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();

    if status.is_server_error() {
        warn!(
            "event=http_request module=api status=error method={method} path={path} code={} duration_ms={duration_ms}",
            status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=api status=ok method={method} path={path} code={} duration_ms={duration_ms}",
            status.as_u16()
        );
    }

    response
}
