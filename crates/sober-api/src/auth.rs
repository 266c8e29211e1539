use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use sober_db::DbError;
use sober_db::models::NewAccount;
use sober_types::api::{CreateAccountRequest, CreateAccountResponse, LoginRequest, LoginResponse};
use sober_types::models::Account;

use crate::error::ApiError;
use crate::{AppState, password, run_blocking, validation};

const BAD_CREDENTIALS: &str = "invalid email or password";

pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let username = validation::username(&req.username)?;
    let email = validation::email(&req.email)?;
    validation::password(&req.password)?;

    // Check if email is taken
    let db = state.db.clone();
    let lookup = email.clone();
    let taken = run_blocking(move || match db.find_account_by_email(&lookup) {
        Ok(_) => Ok(true),
        Err(DbError::NotFound) => Ok(false),
        Err(e) => Err(e.into()),
    })
    .await?;
    if taken {
        return Err(ApiError::Conflict("email is already registered"));
    }

    let plaintext = req.password;
    let password_hash = run_blocking(move || Ok(password::hash_password(&plaintext)?)).await?;

    let db = state.db.clone();
    let row = run_blocking(move || {
        Ok(db.create_account(&NewAccount {
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        })?)
    })
    .await?;

    info!(account_id = row.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse {
            id: row.id,
            account: Account {
                id: row.id,
                username: row.username,
                email: row.email,
                created_at: row.created_at,
            },
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let email = validation::email(&req.email)?;
    validation::required("password", &req.password)?;

    let db = state.db.clone();
    let account = run_blocking(move || match db.find_account_by_email(&email) {
        Ok(account) => Ok(Some(account)),
        Err(DbError::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    })
    .await?;

    // Verify password; an unknown email still pays for one Argon2 verify
    let stored = account.as_ref().map(|a| a.password_hash.clone());
    let plaintext = req.password;
    let valid = run_blocking(move || match stored {
        Some(hash) => Ok(password::verify_password(&hash, &plaintext)?),
        None => Ok(password::verify_placeholder(&plaintext)),
    })
    .await?;

    let account = match account {
        Some(account) if valid => account,
        _ => return Err(ApiError::Unauthorized(BAD_CREDENTIALS)),
    };

    let token = state
        .tokens
        .issue(account.id, &account.username, &account.email)?;

    info!(account_id = account.id, "Login succeeded");

    Ok(Json(LoginResponse {
        username: account.username,
        email: account.email,
        token,
    }))
}
