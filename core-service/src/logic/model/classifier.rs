//! Classifier seam
//!
//! The trained model is opaque: it takes one layout-ordered vector and returns
//! a class label and per-class probabilities.

use serde::{Deserialize, Serialize};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceError(pub String);

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InferenceError: {}", self.0)
    }
}

impl std::error::Error for InferenceError {}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(rename = "path")]
    pub model_path: String,
    /// SHA-256 of the artifact bytes
    pub sha256: String,
    pub model_type: String,
    pub producer: Option<String>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Trait for trained classifiers (ONNX Runtime, test doubles, ...)
///
/// Implementations are shared across request handlers and must tolerate
/// concurrent calls.
pub trait Classifier: Send + Sync {
    /// Predicted class label
    fn predict(&self, features: &[f32]) -> Result<i64, InferenceError>;

    /// Per-class probabilities, same class order as `predict`
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, InferenceError>;

    /// `predict` followed by `predict_proba`.
    /// Runtimes that produce both from one pass override this.
    fn classify(&self, features: &[f32]) -> Result<(i64, Vec<f32>), InferenceError> {
        let label = self.predict(features)?;
        let probabilities = self.predict_proba(features)?;
        Ok((label, probabilities))
    }

    /// Input width declared by the artifact, if it exposes one
    fn input_width(&self) -> Option<usize> {
        None
    }

    /// Column names the model was trained on, if the artifact carries them
    fn feature_names(&self) -> Option<Vec<String>> {
        None
    }

    fn metadata(&self) -> Option<&ModelMetadata> {
        None
    }
}
