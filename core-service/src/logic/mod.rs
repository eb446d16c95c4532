//! Logic Module
//!
//! features -> model -> inference for the serving path,
//! dataset for offline preparation.

pub mod dataset;
pub mod features;
pub mod inference;
pub mod model;
