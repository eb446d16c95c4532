//! Feature Assembler
//!
//! Defaults ⊕ client record → layout-ordered vector. Pure and infallible:
//! anything the model cannot take is tagged here and rejected at inference.

use serde_json::{Map, Value};

use super::defaults::DefaultTable;
use super::layout::feature_index;
use super::vector::{FeatureSlot, FeatureVector};

/// Builds feature vectors from a fixed default table
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    defaults: DefaultTable,
}

impl FeatureAssembler {
    pub fn new(defaults: DefaultTable) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &DefaultTable {
        &self.defaults
    }

    /// The vector produced for an empty record
    pub fn default_vector(&self) -> FeatureVector {
        FeatureVector::from_slots(
            self.defaults
                .slots()
                .iter()
                .map(|d| FeatureSlot::from_default(*d))
                .collect(),
        )
    }

    /// Merge a client record over the defaults.
    /// Client values win; keys outside the layout are ignored.
    pub fn assemble(&self, record: &Map<String, Value>) -> FeatureVector {
        let mut vector = self.default_vector();
        let mut ignored = 0usize;

        for (key, value) in record {
            match feature_index(key) {
                Some(index) => vector.set(index, FeatureSlot::from_json(value)),
                None => {
                    ignored += 1;
                    log::debug!("Ignoring unknown feature '{}'", key);
                }
            }
        }

        if ignored > 0 {
            log::debug!("{} record keys outside the feature layout", ignored);
        }

        vector
    }
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::new(DefaultTable::standard())
    }
}
