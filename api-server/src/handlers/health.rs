//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use athero_core::logic::features::LayoutInfo;
use athero_core::ModelMetadata;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    missing_policy: String,
    model: Option<ModelMetadata>,
    layout: LayoutSummary,
}

#[derive(Serialize)]
pub struct LayoutSummary {
    version: u8,
    hash: String,
    feature_count: usize,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let layout = LayoutInfo::current();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        missing_policy: state.service.policy().to_string(),
        model: state.service.classifier().metadata().cloned(),
        layout: LayoutSummary {
            version: layout.version,
            hash: format!("{:08x}", layout.hash),
            feature_count: layout.feature_count,
        },
    })
}
