//! Configuration module

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use athero_core::constants::{DEFAULT_MODEL_PATH, DEFAULT_PORT};
use athero_core::MissingFeaturePolicy;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// ONNX model artifact
    pub model_path: PathBuf,

    /// Optional JSON file replacing the built-in feature defaults
    pub defaults_path: Option<PathBuf>,

    /// Handling of features with neither default nor client value
    pub missing_policy: MissingFeaturePolicy,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let missing_policy = match env::var("MISSING_FEATURE_POLICY") {
            Ok(raw) => raw
                .parse()
                .map_err(anyhow::Error::msg)
                .context("invalid MISSING_FEATURE_POLICY")?,
            Err(_) => MissingFeaturePolicy::default(),
        };

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH)),

            defaults_path: env::var("DEFAULT_VALUES_PATH").ok().map(PathBuf::from),

            missing_policy,

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
