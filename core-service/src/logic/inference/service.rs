//! Prediction Service
//!
//! Owns the assembler and the loaded classifier. Both are fixed at
//! construction; `predict` takes `&self` and is safe to call from many
//! request handlers at once.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{PredictError, StartupError};
use crate::constants::CONFIDENCE_DECIMALS;
use crate::logic::features::layout::{check_feature_count, check_feature_names};
use crate::logic::features::{DefaultTable, FeatureAssembler, FeatureVector};
use crate::logic::model::Classifier;

// ============================================================================
// MISSING FEATURE POLICY
// ============================================================================

/// What to do with layout slots that have neither a default nor a client value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFeaturePolicy {
    /// Send the missing marker (`NaN`) to the model
    #[default]
    Impute,
    /// Refuse the request before inference
    Reject,
}

impl FromStr for MissingFeaturePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "impute" => Ok(Self::Impute),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown missing-feature policy '{}' (expected 'impute' or 'reject')",
                other
            )),
        }
    }
}

impl fmt::Display for MissingFeaturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Impute => write!(f, "impute"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

// ============================================================================
// PREDICTION RESULT
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub class_label: i64,
    /// Max class probability, rounded to `CONFIDENCE_DECIMALS`
    pub confidence: f64,
}

/// Round half away from zero to `CONFIDENCE_DECIMALS` digits
pub fn round_confidence(value: f64) -> f64 {
    let scale = 10f64.powi(CONFIDENCE_DECIMALS);
    (value * scale).round() / scale
}

/// Summarize raw model output into label + confidence
pub fn summarize(label: i64, probabilities: &[f32]) -> Result<PredictionResult, PredictError> {
    if probabilities.is_empty() {
        return Err(PredictError::InferenceFailure(
            "model returned no class probabilities".to_string(),
        ));
    }
    if let Some(bad) = probabilities.iter().find(|p| !p.is_finite()) {
        return Err(PredictError::InferenceFailure(format!(
            "model returned a non-finite probability ({})",
            bad
        )));
    }

    let max = probabilities
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max) as f64;

    if !(0.0..=1.0).contains(&max) {
        return Err(PredictError::InferenceFailure(format!(
            "model returned a probability outside [0, 1] ({})",
            max
        )));
    }

    Ok(PredictionResult {
        class_label: label,
        confidence: round_confidence(max),
    })
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct PredictionService {
    assembler: FeatureAssembler,
    classifier: Arc<dyn Classifier>,
    policy: MissingFeaturePolicy,
}

impl fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionService")
            .field("defaults", &self.assembler.defaults().defaulted_count())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PredictionService {
    /// Wire the service, checking the model against the feature layout.
    /// Any disagreement is fatal: a shifted column silently mispredicts.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        defaults: DefaultTable,
        policy: MissingFeaturePolicy,
    ) -> Result<Self, StartupError> {
        match classifier.input_width() {
            Some(width) => check_feature_count(width)?,
            None => log::warn!("Model does not declare its input width, skipping width check"),
        }

        match classifier.feature_names() {
            Some(names) => check_feature_names(names.as_slice())?,
            None => log::warn!("Model carries no feature names, column order is unchecked"),
        }

        let undefaulted = defaults.undefaulted_features();
        if !undefaulted.is_empty() {
            log::info!(
                "{} features have no default ({} policy): {}",
                undefaulted.len(),
                policy,
                undefaulted.join(", ")
            );
        }

        Ok(Self {
            assembler: FeatureAssembler::new(defaults),
            classifier,
            policy,
        })
    }

    pub fn assembler(&self) -> &FeatureAssembler {
        &self.assembler
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn policy(&self) -> MissingFeaturePolicy {
        self.policy
    }

    /// Full pipeline from a raw request body
    pub fn predict(&self, body: &[u8]) -> Result<PredictionResult, PredictError> {
        let record = parse_record(body)?;
        self.predict_record(&record)
    }

    /// Pipeline from an already parsed record
    pub fn predict_record(
        &self,
        record: &Map<String, Value>,
    ) -> Result<PredictionResult, PredictError> {
        log::debug!("Received record with {} keys", record.len());

        let vector = self.assembler.assemble(record);
        log::debug!("Assembled features: {}", vector.to_log_entry());
        self.predict_vector(&vector)
    }

    /// Apply the missing policy, run the model and summarize
    pub fn predict_vector(&self, vector: &FeatureVector) -> Result<PredictionResult, PredictError> {
        if self.policy == MissingFeaturePolicy::Reject {
            let missing = vector.missing_features();
            if !missing.is_empty() {
                return Err(PredictError::MissingFeatures(
                    missing.into_iter().map(String::from).collect(),
                ));
            }
        }

        let input = vector
            .to_model_input()
            .map_err(|e| PredictError::InferenceFailure(e.to_string()))?;

        let (label, probabilities) = self.classifier.classify(&input)?;
        let result = summarize(label, &probabilities)?;

        log::debug!(
            "Prediction: class {} (confidence {})",
            result.class_label,
            result.confidence
        );

        Ok(result)
    }
}

/// Decode a request body into a JSON object
pub fn parse_record(body: &[u8]) -> Result<Map<String, Value>, PredictError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| PredictError::MalformedRequest(format!("invalid JSON: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(PredictError::MalformedRequest(format!(
            "request body must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
