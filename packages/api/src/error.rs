use actors::ActorError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Body returned when a request lacks a required field.
pub const MISSING_DATA_MESSAGE: &str = "Required data not present";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Required data not present")]
    MissingData,

    #[error("Job queue error: {0}")]
    Queue(#[from] ActorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingData => (StatusCode::BAD_REQUEST, MISSING_DATA_MESSAGE).into_response(),
            Self::Queue(e) => {
                tracing::error!("Job queue error: {}", e);
                let body = Json(json!({ "error": "An internal error occurred." }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
