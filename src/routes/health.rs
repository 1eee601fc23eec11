use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthData {
    status: u16,
}

pub async fn health() -> Json<HealthData> {
    Json(HealthData {
        status: StatusCode::OK.as_u16(),
    })
}

/// Plain-text liveness probe kept for clients that poll `/api-status`.
pub async fn api_status() -> &'static str {
    "This is a fallback response"
}
