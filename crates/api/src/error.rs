//! API Error Responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feature_engine::{EncodeError, UnknownDomain};
use inference_engine::InferenceError;
use serde_json::json;
use thiserror::Error;

/// Request-scoped failures, rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be read as a JSON object or form
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    UnknownDomain(#[from] UnknownDomain),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Out-of-range values under strict validation
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::UnknownDomain(_) | ApiError::Encode(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Inference(InferenceError::ModelUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for the error metric
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::UnknownDomain(_) => "unknown_model_type",
            ApiError::Encode(EncodeError::MissingField(_)) => "missing_field",
            ApiError::Encode(_) => "type_conversion",
            ApiError::Validation(_) => "out_of_range",
            ApiError::Inference(InferenceError::ModelUnavailable(_)) => "model_unavailable",
            ApiError::Inference(_) => "inference",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Prediction failed: {}", self);
        } else {
            tracing::debug!("Rejected prediction request: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
