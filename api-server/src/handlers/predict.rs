//! Prediction handler

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: i64,
    pub confidence: f64,
}

/// POST /predict
///
/// Takes the raw body so malformed JSON gets the same error envelope as
/// every other failure.
pub async fn predict(State(state): State<AppState>, body: Bytes) -> AppResult<Json<PredictResponse>> {
    tracing::debug!("Received {} byte prediction request", body.len());

    // ONNX runs are CPU-bound and serialised on the session lock
    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.predict(&body))
        .await
        .map_err(|e| AppError::Internal(format!("prediction task failed: {}", e)))??;

    tracing::info!(
        prediction = result.class_label,
        confidence = result.confidence,
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        prediction: result.class_label,
        confidence: result.confidence,
    }))
}
