//! Error handling
//!
//! Every failure leaves as `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use athero_core::PredictError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Client sent something unusable
    #[error("{0}")]
    BadRequest(String),

    /// Inference or other server-side failure
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Internal(msg) => {
                tracing::error!("Prediction failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::MalformedRequest(_) | PredictError::MissingFeatures(_) => {
                AppError::BadRequest(err.to_string())
            }
            PredictError::InferenceFailure(msg) => AppError::Internal(msg),
        }
    }
}
