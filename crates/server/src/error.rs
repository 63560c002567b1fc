//! Error-to-response mapping
//!
//! Three classes: validation failures and domain errors are
//! client-caused and answer 400 with the violated rule; everything else
//! answers 500 with a generic message, full detail only in logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::validation::ValidationError;

/// Error surface of the prediction pipeline
#[derive(Debug)]
pub enum ApiError {
    /// A request that violated the contract (400)
    Validation(ValidationError),
    /// A client-caused failure detected past validation (400)
    Domain(String),
    /// Anything else (500); detail stays server-side
    Internal(anyhow::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(err) => {
                tracing::warn!(error = %err, "validation failed");
                (StatusCode::BAD_REQUEST, Json(json!({"error": err.to_string()}))).into_response()
            }
            Self::Domain(message) => {
                tracing::warn!(error = %message, "domain error");
                (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
            }
            Self::Internal(err) => {
                tracing::error!(error = ?err, "prediction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "internal server error"})),
                )
                    .into_response()
            }
        }
    }
}
