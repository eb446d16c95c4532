//! Feature Vector - Core data structure for ML input
//!
//! **Versioned, tagged feature vector**
//!
//! Every slot is explicitly a number, the missing marker, or a client value
//! the model cannot take. Conversion to the model's `f32` input happens once,
//! at the inference boundary.

use serde_json::Value;

use super::layout::{feature_index, layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};

// ============================================================================
// FEATURE SLOT
// ============================================================================

/// One slot of the feature vector
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureSlot {
    Number(f64),
    /// Neither a default nor a client value
    Missing,
    /// Client supplied something that is not a number (kept verbatim)
    NonNumeric(String),
}

impl FeatureSlot {
    /// Tag a raw client value.
    /// Booleans map to 1/0, `null` to the missing marker.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(v) => FeatureSlot::Number(v),
                None => FeatureSlot::NonNumeric(n.to_string()),
            },
            Value::Bool(b) => FeatureSlot::Number(if *b { 1.0 } else { 0.0 }),
            Value::Null => FeatureSlot::Missing,
            other => FeatureSlot::NonNumeric(other.to_string()),
        }
    }

    pub fn from_default(value: Option<f64>) -> Self {
        value.map_or(FeatureSlot::Missing, FeatureSlot::Number)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FeatureSlot::Missing)
    }
}

/// A slot whose value the model cannot consume
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("feature '{name}' must be numeric, got {raw}")]
pub struct NonNumericFeature {
    pub name: &'static str,
    pub raw: String,
}

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
///
/// Always holds exactly `FEATURE_COUNT` slots in `FEATURE_LAYOUT` order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    slots: Vec<FeatureSlot>,
}

impl FeatureVector {
    /// Create a vector with every slot missing
    pub fn new() -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            slots: vec![FeatureSlot::Missing; FEATURE_COUNT],
        }
    }

    /// Create from per-slot values; extra slots are dropped, absent ones are missing
    pub fn from_slots(slots: Vec<FeatureSlot>) -> Self {
        let mut vector = Self::new();
        for (i, slot) in slots.into_iter().take(FEATURE_COUNT).enumerate() {
            vector.slots[i] = slot;
        }
        vector
    }

    pub fn slots(&self) -> &[FeatureSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Get slot by index
    pub fn get(&self, index: usize) -> Option<&FeatureSlot> {
        self.slots.get(index)
    }

    /// Get slot by name
    pub fn get_by_name(&self, name: &str) -> Option<&FeatureSlot> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Set slot by index
    pub fn set(&mut self, index: usize, slot: FeatureSlot) {
        if index < FEATURE_COUNT {
            self.slots[index] = slot;
        }
    }

    /// Names of slots holding the missing marker
    pub fn missing_features(&self) -> Vec<&'static str> {
        FEATURE_LAYOUT
            .iter()
            .zip(&self.slots)
            .filter(|(_, slot)| slot.is_missing())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Model input: `NaN` stands for missing, non-numeric slots are rejected
    pub fn to_model_input(&self) -> Result<Vec<f32>, NonNumericFeature> {
        FEATURE_LAYOUT
            .iter()
            .zip(&self.slots)
            .map(|(name, slot)| match slot {
                FeatureSlot::Number(v) => Ok(*v as f32),
                FeatureSlot::Missing => Ok(f32::NAN),
                FeatureSlot::NonNumeric(raw) => Err(NonNumericFeature {
                    name: *name,
                    raw: raw.clone(),
                }),
            })
            .collect()
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> Value {
        let named: serde_json::Map<String, Value> = FEATURE_LAYOUT
            .iter()
            .zip(&self.slots)
            .map(|(name, slot)| {
                let value = match slot {
                    FeatureSlot::Number(v) => serde_json::json!(v),
                    FeatureSlot::Missing => Value::Null,
                    FeatureSlot::NonNumeric(raw) => Value::String(raw.clone()),
                };
                (name.to_string(), value)
            })
            .collect();

        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "missing": self.missing_features().len(),
            "named_values": named,
        })
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}
