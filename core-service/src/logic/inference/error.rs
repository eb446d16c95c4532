//! Error taxonomy for the serving path

use crate::logic::features::{DefaultTableError, SchemaMismatch};
use crate::logic::model::InferenceError;

/// Per-request failures; the service keeps serving after any of them
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    /// Body is not JSON, or not a JSON object
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Raised only under `MissingFeaturePolicy::Reject`
    #[error("missing required features: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),

    /// The model rejected the input or failed while running.
    /// Carries the underlying message verbatim.
    #[error("{0}")]
    InferenceFailure(String),
}

impl From<InferenceError> for PredictError {
    fn from(err: InferenceError) -> Self {
        PredictError::InferenceFailure(err.0)
    }
}

/// Failures that must stop the process before it serves anything
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load model: {0}")]
    ModelLoad(#[from] InferenceError),

    #[error("model does not match the feature layout: {0}")]
    Schema(#[from] SchemaMismatch),

    #[error("invalid default table: {0}")]
    Defaults(#[from] DefaultTableError),
}
