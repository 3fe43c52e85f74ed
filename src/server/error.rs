use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::locator::LocateError;

const SUGGESTIONS: &[&str] = &[
    "Check the spelling of the medicine name",
    "Try the generic name instead of a brand name",
    "Browse /popular-medicines for names known to work",
];

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Locate(e) => {
                let (status, error) = match e {
                    LocateError::Transport { .. } => {
                        (StatusCode::BAD_GATEWAY, "Medicine source unreachable")
                    }
                    LocateError::NoSearchResults { .. } | LocateError::DocumentNotFound { .. } => {
                        (StatusCode::NOT_FOUND, "Medicine not found")
                    }
                };
                tracing::warn!(url = e.url(), error = %e, "Lookup failed");
                (
                    status,
                    json!({
                        "error": error,
                        "message": e.to_string(),
                        "url": e.url(),
                        "suggestions": SUGGESTIONS,
                        "status": status.as_u16(),
                    }),
                )
            }
            ApiError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg, "status": 400 }),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal error", "status": 500 }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
