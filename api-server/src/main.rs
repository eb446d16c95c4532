//! Athero Risk API Server
//!
//! Serves the trained atherosclerosis risk model over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ATHERO RISK API                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  POST /predict ──► parse ──► assemble ──► infer ──► JSON │
//! │                              (defaults)  (ONNX)          │
//! │  GET  /health  ──► model + layout status                 │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use athero_core::{DefaultTable, OnnxClassifier, PredictionService};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "athero_api=debug,athero_core=info,tower_http=debug".into());
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Athero Risk API starting ({})...", config.environment);
    tracing::info!("Model: {}", config.model_path.display());

    // Startup failures are fatal: nothing is served without a matching model
    let state = build_state(&config).context("startup failed")?;

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

/// Load the model and defaults, validate them against the feature layout
fn build_state(config: &config::Config) -> anyhow::Result<AppState> {
    let defaults = match &config.defaults_path {
        Some(path) => DefaultTable::from_json_file(path)
            .map_err(athero_core::StartupError::from)?,
        None => DefaultTable::standard(),
    };

    let classifier = OnnxClassifier::load(&config.model_path)
        .map_err(athero_core::StartupError::from)?;

    let service = PredictionService::new(Arc::new(classifier), defaults, config.missing_policy)?;
    tracing::info!(
        "Prediction service ready ({} defaults, missing policy: {})",
        service.assembler().defaults().defaulted_count(),
        service.policy()
    );

    Ok(AppState {
        service: Arc::new(service),
    })
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
