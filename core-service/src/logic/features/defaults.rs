//! Default Value Table
//!
//! Fallback values used when a client omits a feature. Stored by layout slot
//! so that lookups during assembly never go through the name map.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use super::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT};

/// Defaults shipped with the deployed model.
/// The twelve top features (`Cholesterol LDL_x` .. `Manganese (mg)`) have none.
pub const STANDARD_DEFAULTS: &[(&str, f64)] = &[
    ("Weight", 70.0),
    ("Type of Diet_5", 0.0),
    ("Gender", 1.0),
    ("Iron (mg)", 15.0),
    ("Type of Diet_4", 0.0),
    ("Vitamin B7 (µg)", 30.0),
    ("omega 3", 1.6),
    ("Protein (%)", 20.0),
    ("Height", 170.0),
    ("wit. B1 - Tiamina", 1.2),
    ("BMI_Category", 2.0),
    ("Vitamin B3 (mg)", 16.0),
    ("Vitamin E (mg)", 15.0),
    ("Cholesterol (mg/day)", 300.0),
    ("Omega 6 (g)", 17.0),
    ("Age", 35.0),
    ("Number of Meals per Day", 3.0),
    ("Type of Diet_1", 0.0),
    ("Age_Category", 2.0),
    ("Sodium (mg)", 2300.0),
    ("Type of Diet_3", 0.0),
    ("Cholesterol LDL_y", 100.0),
    ("Dietary Fiber (g)", 25.0),
    ("Type of Diet_6", 0.0),
    ("Vitamin B12 (µg)", 2.4),
    ("Potassium (mg)", 3500.0),
    ("Physical Activity", 2.0),
    ("Vitamin K (µg)", 120.0),
    ("Vitamin C (mg)", 90.0),
    ("Iodine (µg)", 150.0),
    ("Vitamin A (µg)", 900.0),
    ("Carbohydrate_Fat_Ratio", 1.5),
    ("Calcium (mg)", 1000.0),
    ("Phosphorus (mg)", 700.0),
    ("Magnesium (mg)", 400.0),
    ("Height_m", 1.7),
    ("Vitamin B6 (mg)", 1.7),
    ("Type of Diet_2", 0.0),
];

/// Errors building a default table
#[derive(Debug, thiserror::Error)]
pub enum DefaultTableError {
    #[error("default given for unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("default for '{name}' is not a finite number")]
    NotFinite { name: String },

    #[error("failed to read defaults file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid defaults file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable mapping from layout slot to default value
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTable {
    values: Vec<Option<f64>>,
}

impl DefaultTable {
    /// The table deployed with the model
    pub fn standard() -> Self {
        // The constant table only names layout features, checked by tests.
        let mut values = vec![None; FEATURE_COUNT];
        for (name, value) in STANDARD_DEFAULTS {
            if let Some(index) = feature_index(name) {
                values[index] = Some(*value);
            }
        }
        Self { values }
    }

    /// A table with no defaults at all
    pub fn empty() -> Self {
        Self {
            values: vec![None; FEATURE_COUNT],
        }
    }

    /// Build from (name, value) pairs; every name must be a layout feature
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, DefaultTableError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut values = vec![None; FEATURE_COUNT];
        for (name, value) in pairs {
            let name = name.as_ref();
            let index = feature_index(name)
                .ok_or_else(|| DefaultTableError::UnknownFeature(name.to_string()))?;
            if !value.is_finite() {
                return Err(DefaultTableError::NotFinite {
                    name: name.to_string(),
                });
            }
            values[index] = Some(value);
        }
        Ok(Self { values })
    }

    /// Parse a JSON object of `{"feature": number}`
    pub fn from_json_str(json: &str) -> Result<Self, DefaultTableError> {
        let map: HashMap<String, f64> = serde_json::from_str(json)?;
        Self::from_pairs(map)
    }

    /// Load a JSON defaults file
    pub fn from_json_file(path: &Path) -> Result<Self, DefaultTableError> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&content)?;
        log::info!(
            "Loaded {} feature defaults from {}",
            table.defaulted_count(),
            path.display()
        );
        Ok(table)
    }

    /// Default for a layout slot
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Default for a feature name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Per-slot defaults in layout order
    pub fn slots(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn defaulted_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Layout features that have no default
    pub fn undefaulted_features(&self) -> Vec<&'static str> {
        FEATURE_LAYOUT
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Named view for logging
    pub fn to_named(&self) -> Vec<DefaultEntry> {
        FEATURE_LAYOUT
            .iter()
            .zip(&self.values)
            .filter_map(|(name, v)| v.map(|value| DefaultEntry { name: *name, value }))
            .collect()
    }
}

impl Default for DefaultTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DefaultEntry {
    pub name: &'static str,
    pub value: f64,
}
