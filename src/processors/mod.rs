//! Image processing utilities for classifier analysis.
//!
//! This module provides the pixel-level building blocks the analysis engines
//! are assembled from: statistics over raw pixels, resizing to and from the
//! working grid, image-to-tensor encoding, and heatmap color mapping.
//!
//! # Modules
//!
//! * `colormap` - Jet colormap rendering for heatmaps
//! * `normalization` - Image-to-tensor encoding for the classifier boundary
//! * `resize` - Resizing to the analysis grid and back
//! * `stats` - Pixel-statistics primitives
//! * `types` - Type definitions used across the processors module

mod colormap;
mod normalization;
mod resize;
pub mod stats;
pub mod types;

pub use colormap::jet_rgba;
pub use normalization::InputEncoder;
pub use resize::{resize_to_analysis, upscale_rgba};
pub use types::*;
