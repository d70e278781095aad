//! Configuration utilities for the analysis toolkit.
//!
//! This module provides the error type and validation trait used by
//! configuration structures, along with the tunable parameter sets for
//! input-distribution validation, saliency rendering, and confidence banding.
//! Every heuristic constant that callers may want to adjust lives in one of
//! these structs rather than being scattered through the algorithms.

use thiserror::Error;

use crate::core::constants::{
    DEFAULT_ACTIVATION_BLEND, DEFAULT_BLUE_WEIGHT, DEFAULT_CONFIDENT_THRESHOLD,
    DEFAULT_GREEN_WEIGHT, DEFAULT_MIN_BRIGHTNESS_FALLOFF, DEFAULT_MIN_COLOR_VARIANCE,
    DEFAULT_MIN_ENTROPY_BITS, DEFAULT_MIN_RED_DOMINANCE, DEFAULT_PLAUSIBLE_THRESHOLD,
    DEFAULT_RED_WEIGHT, DEFAULT_VARIANCE_WEIGHT,
};

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that a resource limit has been exceeded.
    #[error("resource limit exceeded: {message}")]
    ResourceLimitExceeded { message: String },
}

/// A trait for validating configuration parameters.
///
/// This trait provides methods for validating the numeric parameters used
/// by the analysis components, such as thresholds, weights, and image
/// dimensions.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    ///
    /// # Returns
    ///
    /// The default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a usize value is positive.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `field_name` - The name of the field being validated.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_positive_usize(&self, value: usize, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0", field_name),
            });
        }
        Ok(())
    }

    /// Validates that an f32 value is positive.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `field_name` - The name of the field being validated.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_positive_f32(&self, value: f32, field_name: &str) -> Result<(), ConfigError> {
        if value <= 0.0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0.0", field_name),
            });
        }
        Ok(())
    }

    /// Validates that an f32 value is within a range.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `min` - The minimum allowed value.
    /// * `max` - The maximum allowed value.
    /// * `field_name` - The name of the field being validated.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_f32_range(
        &self,
        value: f32,
        min: f32,
        max: f32,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        if value < min || value > max {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "{} must be between {} and {}, got {}",
                    field_name, min, max, value
                ),
            });
        }
        Ok(())
    }

    /// Validates image dimensions.
    ///
    /// This method checks that the width and height are greater than 0 and do
    /// not exceed the maximum allowed dimensions.
    ///
    /// # Arguments
    ///
    /// * `width` - The width of the image.
    /// * `height` - The height of the image.
    /// * `field_name` - The name of the field being validated.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_image_dimensions(
        &self,
        width: u32,
        height: u32,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "{} dimensions must be greater than 0, got {}x{}",
                    field_name, width, height
                ),
            });
        }

        const MAX_DIMENSION: u32 = 8192;
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(ConfigError::ResourceLimitExceeded {
                message: format!(
                    "{} dimensions {}x{} exceed maximum allowed size {}x{}",
                    field_name, width, height, MAX_DIMENSION, MAX_DIMENSION
                ),
            });
        }

        Ok(())
    }
}

/// Implementation of `From<ConfigError>` for String.
impl From<ConfigError> for String {
    fn from(error: ConfigError) -> Self {
        error.to_string()
    }
}

/// Thresholds for the input-distribution validator.
///
/// Each field is the minimum value a pixel-statistics check must reach to
/// count as a pass. The defaults reproduce the reference screening behavior
/// for retinal fundus photographs.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationThresholds {
    /// Minimum Shannon entropy of the grayscale histogram, in bits.
    pub min_entropy_bits: f32,
    /// Minimum normalized sum of per-channel variances.
    pub min_color_variance: f32,
    /// Minimum fraction of adjacent ring pairs whose brightness falls off
    /// toward the image corners.
    pub min_brightness_falloff: f32,
    /// Minimum share of the red channel in the overall channel mean.
    pub min_red_dominance: f32,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_entropy_bits: DEFAULT_MIN_ENTROPY_BITS,
            min_color_variance: DEFAULT_MIN_COLOR_VARIANCE,
            min_brightness_falloff: DEFAULT_MIN_BRIGHTNESS_FALLOFF,
            min_red_dominance: DEFAULT_MIN_RED_DOMINANCE,
        }
    }
}

impl ConfigValidator for ValidationThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        // A 256-bin histogram cannot exceed 8 bits of entropy.
        self.validate_f32_range(self.min_entropy_bits, 0.0, 8.0, "min_entropy_bits")?;
        self.validate_f32_range(self.min_color_variance, 0.0, 1.0, "min_color_variance")?;
        self.validate_f32_range(
            self.min_brightness_falloff,
            0.0,
            1.0,
            "min_brightness_falloff",
        )?;
        self.validate_f32_range(self.min_red_dominance, 0.0, 1.0, "min_red_dominance")?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Tunable parameters for the saliency map generator.
///
/// The channel weights control how much each color channel contributes to
/// the activation map, the variance weight scales the local texture term,
/// and the blend strength controls how strongly the rendered heatmap is
/// composited over the source image.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SaliencyConfig {
    /// Weight of the red channel in the activation map.
    pub red_weight: f32,
    /// Weight of the green channel in the activation map.
    pub green_weight: f32,
    /// Weight of the blue channel in the activation map.
    pub blue_weight: f32,
    /// Weight of the local standard deviation term.
    pub variance_weight: f32,
    /// Opacity of the heatmap when composited over the source image.
    pub blend_strength: f32,
}

impl Default for SaliencyConfig {
    fn default() -> Self {
        Self {
            red_weight: DEFAULT_RED_WEIGHT,
            green_weight: DEFAULT_GREEN_WEIGHT,
            blue_weight: DEFAULT_BLUE_WEIGHT,
            variance_weight: DEFAULT_VARIANCE_WEIGHT,
            blend_strength: DEFAULT_ACTIVATION_BLEND,
        }
    }
}

impl ConfigValidator for SaliencyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_f32_range(self.red_weight, 0.0, 1.0, "red_weight")?;
        self.validate_f32_range(self.green_weight, 0.0, 1.0, "green_weight")?;
        self.validate_f32_range(self.blue_weight, 0.0, 1.0, "blue_weight")?;
        self.validate_f32_range(self.variance_weight, 0.0, 1.0, "variance_weight")?;
        self.validate_f32_range(self.blend_strength, 0.0, 1.0, "blend_strength")?;
        let channel_sum = self.red_weight + self.green_weight + self.blue_weight;
        self.validate_positive_f32(channel_sum, "channel weight sum")?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Confidence cutoffs for interpreting classifier probabilities.
///
/// A prediction at or above `confident` is trusted outright; one at or above
/// `plausible` is worth surfacing with a caveat; anything below is treated
/// as unreliable.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConfidenceThresholds {
    /// Probability at or above which a prediction is confident.
    pub confident: f32,
    /// Probability at or above which a prediction is plausible.
    pub plausible: f32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            confident: DEFAULT_CONFIDENT_THRESHOLD,
            plausible: DEFAULT_PLAUSIBLE_THRESHOLD,
        }
    }
}

impl ConfigValidator for ConfidenceThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_f32_range(self.confident, 0.0, 1.0, "confident")?;
        self.validate_f32_range(self.plausible, 0.0, 1.0, "plausible")?;
        if self.plausible > self.confident {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "plausible threshold {} must not exceed confident threshold {}",
                    self.plausible, self.confident
                ),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
