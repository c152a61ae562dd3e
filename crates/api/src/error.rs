//! API Error Responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feature_engine::FeatureError;
use ingestion::IngestError;
use market_frame::FrameError;
use regressor::RegressorError;
use serde::Serialize;
use thiserror::Error;

/// API-layer error type, mapped to HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400, invalid input
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 500, failure inside the pipeline
    #[error("internal error: {0}")]
    Internal(String),

    /// 503, the service has no data or model to answer with yet
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg),
        };

        let body = ErrorBody {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<FrameError> for ApiError {
    fn from(err: FrameError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<FeatureError> for ApiError {
    fn from(err: FeatureError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<RegressorError> for ApiError {
    fn from(err: RegressorError) -> Self {
        match err {
            RegressorError::NoProcessedFiles => {
                ApiError::Unavailable("no processed files available yet".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
