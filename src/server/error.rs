use crate::errors::RelayError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// Comment body was not the trigger token.
    #[error("Error")]
    NotTriggered,
    #[error("Missing or invalid field `{0}`")]
    MissingField(&'static str),
    #[error("Ticket creation failed: {0}")]
    Upstream(#[from] RelayError),
    #[error("Failed to render response: {0}")]
    Render(#[source] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::NotTriggered => {
                return (StatusCode::BAD_REQUEST, self.to_string()).into_response();
            }
            ApiError::InvalidPayload(_) | ApiError::MissingField(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string() }),
            ),
            ApiError::Upstream(err) => (
                StatusCode::BAD_GATEWAY,
                json!({
                    "error": self.to_string(),
                    "upstream_status": err.upstream_status(),
                }),
            ),
            ApiError::Render(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
