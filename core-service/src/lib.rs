//! Athero Core - Risk Model Serving Library
//!
//! Builds the fixed-layout feature vector the atherosclerosis risk model was
//! trained on, runs the model and summarizes its output.
//! The `dataset` module holds the offline preparation steps for training data.

pub mod constants;
pub mod logic;

// Re-export common types
pub use logic::features::{
    DefaultTable, FeatureAssembler, FeatureSlot, FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT,
};
pub use logic::inference::{
    MissingFeaturePolicy, PredictError, PredictionResult, PredictionService, StartupError,
};
pub use logic::model::{Classifier, InferenceError, ModelMetadata, OnnxClassifier};
