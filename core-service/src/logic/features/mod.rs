//! Features Module - Feature Assembly
//!
//! Layout (schema + version hash), default table, tagged vector and the
//! assembler that merges a client record into it.

pub mod assembler;
pub mod defaults;
pub mod layout;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use assembler::FeatureAssembler;
pub use defaults::{DefaultTable, DefaultTableError};
pub use layout::{LayoutInfo, SchemaMismatch, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::{FeatureSlot, FeatureVector, NonNumericFeature};
