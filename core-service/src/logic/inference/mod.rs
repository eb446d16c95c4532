//! Inference Module - Request → Prediction
//!
//! parse → assemble → infer → summarize, single pass, no retries.

pub mod error;
pub mod service;


pub use error::{PredictError, StartupError};
pub use service::{MissingFeaturePolicy, PredictionResult, PredictionService};
