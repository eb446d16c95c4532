//! Model Module - Trained Classifier
//!
//! The service only talks to the `Classifier` trait.
//! `OnnxClassifier` is the runtime used in production; tests substitute their own.

pub mod classifier;
pub mod onnx;

// Re-export common types
pub use classifier::{Classifier, InferenceError, ModelMetadata};
pub use onnx::OnnxClassifier;
