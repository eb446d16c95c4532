//! Central Configuration Constants
//!
//! Single source of truth for defaults shared by the server and the prep tool.

/// Default model artifact path (relative to the working directory)
pub const DEFAULT_MODEL_PATH: &str = "models/atherosclerosis.onnx";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5000;

/// Decimal digits kept in the reported confidence
pub const CONFIDENCE_DECIMALS: i32 = 4;

/// Custom ONNX metadata key carrying the trained column order
pub const FEATURE_NAMES_METADATA_KEY: &str = "feature_names";

/// Default output file of the imputation pass
pub const DEFAULT_PROCESSED_PATH: &str = "processed_data.csv";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Athero Risk";
