//! Constants used throughout the analysis toolkit.
//!
//! This module defines the fixed resolutions, heuristic thresholds, and
//! rendering parameters shared by the validation, metrics, and saliency
//! components. Tunable values surface through the configuration structs in
//! [`crate::core::config`]; the constants here are their defaults plus the
//! structural values that are part of the algorithm contracts.

/// The working resolution for pixel-statistics analysis.
///
/// Input images are downscaled to this (width, height) before the
/// distribution checks and the activation map are computed, and it is also
/// the resolution of the classifier input tensor.
pub const ANALYSIS_INPUT_SHAPE: (u32, u32) = (224, 224);

/// The minimum width and height accepted by the classifier boundary.
///
/// Images smaller than this in either dimension are rejected before
/// encoding.
pub const MIN_INPUT_DIMENSION: u32 = 50;

/// The default threshold for parallel processing.
///
/// This constant defines the minimum number of items that need
/// to be processed before parallel processing is used.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;

/// The number of bins in the grayscale intensity histogram.
pub const HISTOGRAM_BINS: usize = 256;

/// The default minimum Shannon entropy, in bits, for the entropy check.
pub const DEFAULT_MIN_ENTROPY_BITS: f32 = 2.0;

/// The default minimum normalized color variance for the variance check.
pub const DEFAULT_MIN_COLOR_VARIANCE: f32 = 0.02;

/// The default minimum falloff fraction for the circular structure check.
pub const DEFAULT_MIN_BRIGHTNESS_FALLOFF: f32 = 0.3;

/// The default minimum red-channel share for the dominance check.
pub const DEFAULT_MIN_RED_DOMINANCE: f32 = 0.3;

/// The number of concentric rings in the radial brightness profile.
pub const RADIAL_RING_COUNT: usize = 5;

/// The score contributed by each passing distribution check.
pub const CHECK_SCORE_WEIGHT: f32 = 0.25;

/// The score at or above which an input is considered in-distribution.
pub const VALID_SCORE_THRESHOLD: f32 = 0.5;

/// The default weight of the red channel in the activation map.
pub const DEFAULT_RED_WEIGHT: f32 = 0.5;

/// The default weight of the green channel in the activation map.
pub const DEFAULT_GREEN_WEIGHT: f32 = 0.3;

/// The default weight of the blue channel in the activation map.
pub const DEFAULT_BLUE_WEIGHT: f32 = 0.2;

/// The default weight of the local standard deviation term.
pub const DEFAULT_VARIANCE_WEIGHT: f32 = 0.3;

/// The default opacity of the heatmap over the source image.
pub const DEFAULT_ACTIVATION_BLEND: f32 = 0.5;

/// The minimum alpha of a rendered heatmap pixel.
///
/// Heatmap alpha scales linearly from this floor up to
/// `HEATMAP_ALPHA_FLOOR + HEATMAP_ALPHA_SCALE` as activation goes 0 to 1.
pub const HEATMAP_ALPHA_FLOOR: f32 = 55.0;

/// The alpha range of a rendered heatmap pixel above the floor.
pub const HEATMAP_ALPHA_SCALE: f32 = 200.0;

/// The default probability at or above which a prediction is confident.
pub const DEFAULT_CONFIDENT_THRESHOLD: f32 = 0.50;

/// The default probability at or above which a prediction is plausible.
pub const DEFAULT_PLAUSIBLE_THRESHOLD: f32 = 0.30;
