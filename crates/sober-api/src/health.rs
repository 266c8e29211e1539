use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::error;

use sober_types::api::HealthResponse;

use crate::AppState;

pub async fn hello() -> impl IntoResponse {
    Json(json!({ "message": "Hello World" }))
}

/// Reports store reachability. A failed ping is a 503, never a crash.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.clone().health_check(state.config.health_timeout).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "up".into(),
                message: "It's healthy".into(),
            }),
        ),
        Err(e) => {
            error!("Database health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "down".into(),
                    message: "database unavailable".into(),
                }),
            )
        }
    }
}
