//! Health check endpoint.
//!
//! Used by load balancers and process supervisors to verify the service is
//! up. It does not touch the todo file.

use axum::http::StatusCode;

/// Liveness check.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
