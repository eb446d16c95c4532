//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The model consumes a positional vector, so the order below must match the
//! column order the model was trained on exactly.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//! 4. Re-export the model artifact with the new column order

use std::collections::HashMap;

use crc32fast::Hasher;
use once_cell::sync::Lazy;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
/// This is the SINGLE SOURCE OF TRUTH for feature layout
pub const FEATURE_LAYOUT: &[&str] = &[
    "Weight",                  // 0
    "Type of Diet_5",          // 1
    "Gender",                  // 2
    "Iron (mg)",               // 3
    "Type of Diet_4",          // 4
    "Vitamin B7 (µg)",         // 5
    "omega 3",                 // 6
    "Protein (%)",             // 7
    "Height",                  // 8
    "wit. B1 - Tiamina",       // 9
    "BMI_Category",            // 10
    "Vitamin B3 (mg)",         // 11
    "Vitamin E (mg)",          // 12
    "Cholesterol (mg/day)",    // 13
    "Omega 6 (g)",             // 14
    "Age",                     // 15
    "Number of Meals per Day", // 16
    "Type of Diet_1",          // 17
    "Age_Category",            // 18
    "Sodium (mg)",             // 19
    "Type of Diet_3",          // 20
    "Cholesterol LDL_y",       // 21
    "Dietary Fiber (g)",       // 22
    "Type of Diet_6",          // 23
    "Vitamin B12 (µg)",        // 24
    "Potassium (mg)",          // 25
    "Physical Activity",       // 26
    "Vitamin K (µg)",          // 27
    "Vitamin C (mg)",          // 28
    "Iodine (µg)",             // 29
    "Vitamin A (µg)",          // 30
    "Carbohydrate_Fat_Ratio",  // 31
    "Calcium (mg)",            // 32
    "Phosphorus (mg)",         // 33
    "Magnesium (mg)",          // 34
    "Height_m",                // 35
    "Vitamin B6 (mg)",         // 36
    "Type of Diet_2",          // 37
    // === Top features (no default, collected by the client form) ===
    "Cholesterol LDL_x",       // 38
    "Fat (%)",                 // 39
    "Carbohydrates (%)",       // 40
    "wit. B2 - Riboflavin",    // 41
    "Vitamin B5 (mg)",         // 42
    "Copper (mg)",             // 43
    "Zinc (mg)",               // 44
    "Vitamin D (µg)",          // 45
    "BMI",                     // 46
    "Protein_Fat_Ratio",       // 47
    "Selenium (µg)",           // 48
    "Manganese (mg)",          // 49
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 50;

static FEATURE_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    FEATURE_LAYOUT
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i))
        .collect()
});

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Identifies the layout in logs and health output
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    // Hash all feature names in order
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

static LAYOUT_HASH: Lazy<u32> = Lazy::new(compute_layout_hash);

/// Get layout hash (computed once)
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout identity reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// MODEL SCHEMA CHECKS
// ============================================================================

/// Disagreement between the layout and what a model artifact declares
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaMismatch {
    #[error("model expects {actual} features, layout defines {expected}")]
    Count { expected: usize, actual: usize },

    #[error("feature #{index}: model expects '{actual}', layout defines '{expected}'")]
    Name {
        index: usize,
        expected: String,
        actual: String,
    },
}

/// Check a model's input width against the layout
pub fn check_feature_count(actual: usize) -> Result<(), SchemaMismatch> {
    if actual != FEATURE_COUNT {
        return Err(SchemaMismatch::Count {
            expected: FEATURE_COUNT,
            actual,
        });
    }
    Ok(())
}

/// Check a model's declared column order against the layout
pub fn check_feature_names<S: AsRef<str>>(names: &[S]) -> Result<(), SchemaMismatch> {
    check_feature_count(names.len())?;

    for (index, (expected, actual)) in FEATURE_LAYOUT.iter().zip(names).enumerate() {
        let actual = actual.as_ref().trim();
        if *expected != actual {
            return Err(SchemaMismatch::Name {
                index,
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_INDEX.get(name).copied()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_feature_names_unique() {
        assert_eq!(FEATURE_INDEX.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("Weight"), Some(0));
        assert_eq!(feature_index("Age"), Some(15));
        assert_eq!(feature_index("Manganese (mg)"), Some(49));
        assert_eq!(feature_index("weight"), None);
        assert_eq!(feature_index("Foo"), None);
    }

    #[test]
    fn test_check_feature_names() {
        assert!(check_feature_names(FEATURE_LAYOUT).is_ok());

        let short = &FEATURE_LAYOUT[..FEATURE_COUNT - 1];
        assert_eq!(
            check_feature_names(short),
            Err(SchemaMismatch::Count {
                expected: FEATURE_COUNT,
                actual: FEATURE_COUNT - 1
            })
        );

        let mut swapped: Vec<&str> = FEATURE_LAYOUT.to_vec();
        swapped.swap(0, 1);
        match check_feature_names(&swapped) {
            Err(SchemaMismatch::Name { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected name mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_count, FEATURE_COUNT);
        assert_eq!(info.hash, layout_hash());
    }
}
