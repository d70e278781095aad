//! Domain-level structures shared across the analysis pipeline.
//!
//! This module groups the vocabulary and prediction types that represent
//! classification-specific concepts used throughout the crate.

pub mod prediction;
pub mod vocabulary;

pub use prediction::*;
pub use vocabulary::*;
