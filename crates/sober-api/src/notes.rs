use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use sober_db::models::NewNote;
use sober_types::api::{AddNoteRequest, AddNoteResponse, Claims};
use sober_types::models::Note;

use crate::error::ApiError;
use crate::{AppState, run_blocking, validation};

pub async fn add_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<AddNoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let user_id = validation::user_id(req.user_id)?;
    if user_id != claims.sub {
        return Err(ApiError::Forbidden);
    }
    let content = validation::required("content", &req.content)?;

    let now = Utc::now();
    let note = NewNote {
        user_id,
        content,
        created_at: now,
        updated_at: now,
    };

    let db = state.db.clone();
    let (id, note) = run_blocking(move || {
        let id = db.create_note(&note)?;
        Ok((id, note))
    })
    .await?;

    info!(user_id, note_id = id, "Note stored");

    Ok((
        StatusCode::CREATED,
        Json(AddNoteResponse {
            id,
            notes: Note {
                user_id: note.user_id,
                content: note.content,
                created_at: note.created_at,
                updated_at: note.updated_at,
            },
        }),
    ))
}
