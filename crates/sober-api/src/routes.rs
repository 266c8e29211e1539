use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use sober_types::api::ErrorResponse;

use crate::middleware::require_auth;
use crate::{AppState, auth, health, notes, onboarding};

pub fn router(state: AppState) -> Router {
    let request_timeout = state.config.request_timeout;

    let public_routes = Router::new()
        .route("/", get(health::hello))
        .route("/health", get(health::health))
        .route("/api/v1/create-account", post(auth::create_account))
        .route("/api/v1/login-account", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/v1/onboarding", post(onboarding::create_entry))
        .route("/api/v1/add-notes", post(notes::add_note))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::map_response(timeout_body))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Gives the bare 408 from `TimeoutLayer` the same JSON shape as other errors.
async fn timeout_body(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    let body = ErrorResponse {
        status: StatusCode::REQUEST_TIMEOUT.as_u16(),
        message: "request timed out".into(),
    };
    (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response()
}
