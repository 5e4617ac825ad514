//! Error types for the compliance server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use compliance_engine::ModelClientError;
use compliance_types::FieldError;
use serde::Serialize;
use text_extraction::ExtractionError;
use thiserror::Error;
use tracing::{error, warn};

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request body")]
    InvalidRequest(Vec<FieldError>),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Model(#[from] ModelClientError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, details) = match self {
            ServerError::InvalidRequest(details) => {
                warn!("Rejected request: {} invalid field(s)", details.len());
                (StatusCode::BAD_REQUEST, Some(details))
            }
            ServerError::Extraction(_) | ServerError::Model(_) => {
                error!("Compliance check failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        let body = ErrorResponse {
            error: message,
            details,
        };

        (status, Json(body)).into_response()
    }
}
