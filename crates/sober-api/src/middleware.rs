use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::error::ApiError;

/// Extract and validate the bearer token from the Authorization header.
/// Verified claims are inserted as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized("missing bearer token"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized("missing bearer token"))?;

    let claims = state.tokens.verify(token.trim())?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
