use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::MatchError;

pub const PROFILE_INCOMPLETE: &str =
    "User profile not fully initialized. Please complete your profile first.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, error = %self, "api_error");
        } else {
            warn!(status = %status, error = %self, "api_error");
        }

        let body = Json(ErrorResponse {
            message: self.public_message(),
        });
        (status, body).into_response()
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Internal detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Unauthorized(_) => "Unauthorized: Missing or invalid token.".into(),
            ApiError::Forbidden(_) => "Forbidden: Invalid or expired token.".into(),
            ApiError::Internal(_) => "Internal Server Error".into(),
        }
    }
}

impl From<MatchError> for ApiError {
    fn from(value: MatchError) -> Self {
        match value {
            MatchError::ProfileNotFound(_) => ApiError::NotFound(PROFILE_INCOMPLETE.into()),
            other => ApiError::Internal(format!("{other:#}")),
        }
    }
}
