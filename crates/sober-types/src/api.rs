use serde::{Deserialize, Serialize};

use crate::models::{Account, Note, Sobriety};

// -- JWT Claims --

/// Identity claims carried by a bearer token. Shared by the token issuer and
/// the request middleware that verifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: i64,
    pub username: String,
    pub email: String,
    pub exp: usize,
}

// -- Accounts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub id: i64,
    pub account: Account,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub email: String,
    pub token: String,
}

// -- Onboarding --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OnboardingRequest {
    pub user_id: i64,
    pub sobriety: Sobriety,
}

// -- Notes --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddNoteRequest {
    pub user_id: i64,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct AddNoteResponse {
    pub id: i64,
    pub notes: Note,
}

// -- Service --

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}
