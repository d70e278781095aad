//! The core module of the analysis toolkit.
//!
//! This module contains the fundamental components shared by the analysis
//! engines, including:
//! - Configuration structures and validation
//! - Constants used throughout the toolkit
//! - Error handling
//! - Tensor type aliases
//! - The classifier boundary trait
//!
//! It also provides re-exports of commonly used types and functions for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tensor;
pub mod traits;

pub use crate::utils::load_image;
pub use config::{
    ConfidenceThresholds, ConfigError, ConfigValidator, SaliencyConfig, ValidationThresholds,
};
pub use constants::*;
pub use errors::{FundusError, ProcessingStage};
pub use tensor::{ActivationMap, Tensor2D, Tensor4D};
pub use traits::Classifier;
