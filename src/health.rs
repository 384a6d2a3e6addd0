//! A liveness check that does not require authentication.

use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;

/// The body returned by the health check.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    success: bool,
    message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

/// Report that the server is running.
pub async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        success: true,
        message: "Server is running",
        timestamp: OffsetDateTime::now_utc(),
    })
}
