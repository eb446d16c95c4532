//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the exported classifier once and runs it per request.
//! Expected graph: one float input `[1, FEATURE_COUNT]`, a label output
//! (int64) followed by a probability output (float, zipmap disabled).

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{Value, ValueType};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use super::classifier::{Classifier, InferenceError, ModelMetadata};
use crate::constants::FEATURE_NAMES_METADATA_KEY;

/// ONNX-backed classifier
pub struct OnnxClassifier {
    /// `Session::run` needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    proba_output: String,
    input_width: Option<usize>,
    feature_names: Option<Vec<String>>,
    metadata: ModelMetadata,
}

impl OnnxClassifier {
    /// Load the model artifact from disk
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError(format!(
                "Model not found: {}",
                model_path.display()
            )));
        }

        let bytes = std::fs::read(model_path)
            .map_err(|e| InferenceError(format!("Failed to read model: {}", e)))?;

        Self::from_bytes(&bytes, &model_path.display().to_string())
    }

    /// Load from in-memory bytes; `origin` is recorded in the metadata
    pub fn from_bytes(model_bytes: &[u8], origin: &str) -> Result<Self, InferenceError> {
        log::debug!("Building ONNX session ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| InferenceError("Model declares no inputs".to_string()))?;
        let input_name = input.name.clone();
        let input_width = match &input.input_type {
            ValueType::Tensor { shape, .. } => shape
                .last()
                .copied()
                .filter(|d| *d > 0)
                .map(|d| d as usize),
            _ => None,
        };

        if session.outputs.len() < 2 {
            return Err(InferenceError(format!(
                "Model must expose label and probability outputs, found {}",
                session.outputs.len()
            )));
        }
        let label_output = session.outputs[0].name.clone();
        let proba_output = session.outputs[1].name.clone();

        let (producer, feature_names) = match session.metadata() {
            Ok(meta) => {
                let producer = meta.producer().ok();
                let names = meta
                    .custom(FEATURE_NAMES_METADATA_KEY)
                    .ok()
                    .flatten()
                    .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect());
                (producer, names)
            }
            Err(e) => {
                log::warn!("Model metadata unavailable: {}", e);
                (None, None)
            }
        };

        let metadata = ModelMetadata {
            model_path: origin.to_string(),
            sha256: hex::encode(Sha256::digest(model_bytes)),
            model_type: "onnx".to_string(),
            producer,
            loaded_at: chrono::Utc::now(),
        };

        log::info!(
            "ONNX model loaded: input '{}' (width {:?}), outputs '{}' / '{}', sha256 {}",
            input_name,
            input_width,
            label_output,
            proba_output,
            metadata.sha256
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            label_output,
            proba_output,
            input_width,
            feature_names,
            metadata,
        })
    }

    /// Run one pass and copy both outputs out of the session
    fn run(&self, features: &[f32]) -> Result<(i64, Vec<f32>), InferenceError> {
        let start_time = std::time::Instant::now();

        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let label_value = outputs
            .get(&self.label_output)
            .ok_or_else(|| InferenceError(format!("No output '{}'", self.label_output)))?;
        let label = match label_value.try_extract_tensor::<i64>() {
            Ok((_, data)) => data.first().copied(),
            Err(_) => label_value
                .try_extract_tensor::<i32>()
                .map_err(|e| InferenceError(format!("Label extract error: {}", e)))?
                .1
                .first()
                .map(|v| *v as i64),
        }
        .ok_or_else(|| InferenceError("Empty label output".to_string()))?;

        let proba_value = outputs
            .get(&self.proba_output)
            .ok_or_else(|| InferenceError(format!("No output '{}'", self.proba_output)))?;
        let probabilities = proba_value
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                InferenceError(format!(
                    "Probability extract error (export with zipmap disabled): {}",
                    e
                ))
            })?
            .1
            .to_vec();

        log::debug!(
            "ONNX inference took {} us",
            start_time.elapsed().as_micros()
        );

        Ok((label, probabilities))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f32]) -> Result<i64, InferenceError> {
        self.run(features).map(|(label, _)| label)
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, InferenceError> {
        self.run(features).map(|(_, probabilities)| probabilities)
    }

    fn classify(&self, features: &[f32]) -> Result<(i64, Vec<f32>), InferenceError> {
        self.run(features)
    }

    fn input_width(&self) -> Option<usize> {
        self.input_width
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        self.feature_names.clone()
    }

    fn metadata(&self) -> Option<&ModelMetadata> {
        Some(&self.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{DefaultTable, FEATURE_COUNT, FEATURE_LAYOUT};
    use crate::logic::inference::{MissingFeaturePolicy, PredictionService};
    use std::path::PathBuf;
    use std::sync::Arc;

    const AGE_SLOT: usize = 15;

    // Fixture graphs score Age only: p1 = sigmoid((age - 50) / 10), label = p1 > 0.5
    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn features_with_age(age: f32) -> Vec<f32> {
        let mut features = vec![f32::NAN; FEATURE_COUNT];
        features[AGE_SLOT] = age;
        features
    }

    fn sigmoid(x: f32) -> f32 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn test_load_missing_file() {
        let err = OnnxClassifier::load(Path::new("does/not/exist.onnx"))
            .err()
            .expect("missing model must fail");
        assert!(err.0.contains("Model not found"));
    }

    #[test]
    fn test_load_corrupt_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"definitely not a protobuf").unwrap();

        assert!(OnnxClassifier::load(&path).is_err());
    }

    #[test]
    fn test_classify_reads_int64_label_and_probabilities() {
        let classifier = OnnxClassifier::load(&fixture("age_logistic.onnx")).unwrap();

        let (label, probabilities) = classifier.classify(&features_with_age(60.0)).unwrap();
        assert_eq!(label, 1);
        assert_eq!(probabilities.len(), 2);
        assert!((probabilities[1] - sigmoid(1.0)).abs() < 1e-5);
        assert!((probabilities[0] + probabilities[1] - 1.0).abs() < 1e-5);

        let (label, probabilities) = classifier.classify(&features_with_age(30.0)).unwrap();
        assert_eq!(label, 0);
        assert!(probabilities[0] > probabilities[1]);
    }

    #[test]
    fn test_predict_and_predict_proba_agree_with_classify() {
        let classifier = OnnxClassifier::load(&fixture("age_logistic.onnx")).unwrap();
        let features = features_with_age(72.0);

        let (label, probabilities) = classifier.classify(&features).unwrap();
        assert_eq!(classifier.predict(&features).unwrap(), label);
        assert_eq!(classifier.predict_proba(&features).unwrap(), probabilities);
    }

    #[test]
    fn test_int32_label_is_widened() {
        let classifier = OnnxClassifier::load(&fixture("age_logistic_i32.onnx")).unwrap();

        let (label, probabilities) = classifier.classify(&features_with_age(65.0)).unwrap();
        assert_eq!(label, 1);
        assert!((probabilities[1] - sigmoid(1.5)).abs() < 1e-5);
        assert_eq!(classifier.feature_names(), None);
    }

    #[test]
    fn test_single_output_model_is_rejected() {
        let bytes = std::fs::read(fixture("proba_only.onnx")).unwrap();
        let err = OnnxClassifier::from_bytes(&bytes, "proba_only.onnx")
            .err()
            .expect("one output is not enough");
        assert!(err.0.contains("found 1"), "{}", err);
    }

    #[test]
    fn test_declared_schema_is_read() {
        let bytes = std::fs::read(fixture("age_logistic.onnx")).unwrap();
        let classifier = OnnxClassifier::from_bytes(&bytes, "memory").unwrap();

        assert_eq!(classifier.input_width(), Some(FEATURE_COUNT));
        let names = classifier.feature_names().unwrap();
        assert_eq!(names.len(), FEATURE_COUNT);
        assert!(names.iter().zip(FEATURE_LAYOUT).all(|(a, b)| a == b));

        let metadata = classifier.metadata().unwrap();
        assert_eq!(metadata.model_path, "memory");
        assert_eq!(metadata.sha256, hex::encode(Sha256::digest(&bytes)));
        assert_eq!(metadata.producer.as_deref(), Some("athero-fixtures"));
    }

    #[test]
    fn test_service_runs_on_onnx_model() {
        let classifier = OnnxClassifier::load(&fixture("age_logistic.onnx")).unwrap();
        let service = PredictionService::new(
            Arc::new(classifier),
            DefaultTable::standard(),
            MissingFeaturePolicy::Impute,
        )
        .unwrap();

        let result = service.predict(br#"{"Age": 60}"#).unwrap();
        assert_eq!(result.class_label, 1);
        assert_eq!(result.confidence, 0.7311);

        // default Age is 35
        let result = service.predict(b"{}").unwrap();
        assert_eq!(result.class_label, 0);
        assert_eq!(result.confidence, 0.8176);
    }
}
