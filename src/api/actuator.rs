/*
 * Responsibility
 * - GET /actuator/health, GET /actuator/info (liveness / build info)
 * - GET /favicon.ico (browsers ask for it; answer without a body)
 * - Mounted outside /v1 and allowed by the path policy without a principal
 */
use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/actuator/health", get(health))
        .route("/actuator/info", get(info))
        .route("/favicon.ico", get(favicon))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "UP"})))
}

pub async fn info() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
