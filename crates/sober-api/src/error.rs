//! Single translation layer from domain failures to HTTP responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use sober_db::DbError;
use sober_types::api::ErrorResponse;

use crate::password::CredentialError;
use crate::token::TokenError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed JSON, missing fields or values that fail validation.
    #[error("{0}")]
    Validation(String),

    /// Unknown email, wrong password or missing/invalid bearer token.
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("you do not have permission to access this resource")]
    Forbidden,

    #[error("{0}")]
    Conflict(&'static str),

    /// The body references an account that does not exist.
    #[error("user does not exist")]
    UnknownUser,

    #[error("database error: {0}")]
    Database(DbError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) | Self::Token(TokenError::Invalid) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UnknownUser => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_)
            | Self::Credential(_)
            | Self::Token(TokenError::Signing(_))
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ForeignKey => Self::UnknownUser,
            DbError::Conflict => Self::Conflict("email is already registered"),
            other => Self::Database(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details go to the log, never to the client
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "internal server error".to_string()
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
            self.to_string()
        };

        let body = ErrorResponse {
            status: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
