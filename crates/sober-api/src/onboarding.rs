use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use sober_db::models::NewOnboardingEntry;
use sober_types::api::{Claims, OnboardingRequest};
use sober_types::models::{OnboardingEntry, Sobriety};

use crate::error::ApiError;
use crate::{AppState, run_blocking, validation};

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<OnboardingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let user_id = validation::user_id(req.user_id)?;
    if user_id != claims.sub {
        return Err(ApiError::Forbidden);
    }
    let reason = validation::required("reason", &req.sobriety.reason)?;
    let sober_date = validation::sober_date(&req.sobriety.sober_date)?;

    let entry = NewOnboardingEntry {
        user_id,
        reason,
        sober_date,
        created_at: Utc::now(),
    };

    let db = state.db.clone();
    let (id, entry) = run_blocking(move || {
        let id = db.create_onboarding_entry(&entry)?;
        Ok((id, entry))
    })
    .await?;

    info!(user_id, entry_id = id, "Onboarding entry stored");

    Ok(Json(OnboardingEntry {
        id,
        user_id: entry.user_id,
        sobriety: Sobriety {
            reason: entry.reason,
            sober_date: entry.sober_date,
        },
        created_at: entry.created_at,
    }))
}
