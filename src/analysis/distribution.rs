//! Out-of-distribution screening for fundus photographs.
//!
//! Classifiers trained on retinal photographs produce confident nonsense when
//! handed arbitrary pictures. [`DistributionValidator`] screens an image with
//! four cheap statistical checks before any classification happens:
//!
//! 1. Intensity histogram entropy, which rejects flat or synthetic images.
//! 2. Normalized color variance, which rejects single-color frames.
//! 3. Radial brightness falloff, which looks for the bright circular fundus
//!    disc fading toward the image corners.
//! 4. Red channel dominance, which matches the reddish tint of retinal tissue.
//!
//! Each passing check contributes an equal share of the score; an image is
//! accepted when at least half the checks pass.

use std::path::Path;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::{ConfigValidator, ValidationThresholds};
use crate::core::constants::{CHECK_SCORE_WEIGHT, VALID_SCORE_THRESHOLD};
use crate::core::errors::FundusError;
use crate::processors::resize_to_analysis;
use crate::processors::stats::{
    brightness_falloff_fraction, channel_means, intensity_histogram, normalized_color_variance,
    radial_brightness_profile, shannon_entropy_bits,
};
use crate::utils::load_image;

/// Outcome of screening an image before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OODVerdict {
    /// Whether the image looks like a retinal photograph.
    pub is_valid: bool,
    /// Fraction of screening checks that passed, in `[0, 1]`.
    pub score: f32,
    /// One explanation per failed check, in check order.
    pub reasons: Vec<String>,
}

/// Screens images for fundus-photograph characteristics.
///
/// The validator is stateless after construction and can be shared across
/// threads. Thresholds are validated once in [`DistributionValidator::new`];
/// evaluation itself never fails for a decoded image.
#[derive(Debug, Clone)]
pub struct DistributionValidator {
    thresholds: ValidationThresholds,
}

impl Default for DistributionValidator {
    fn default() -> Self {
        Self {
            thresholds: ValidationThresholds::default(),
        }
    }
}

impl DistributionValidator {
    /// Creates a validator with the given thresholds.
    ///
    /// # Arguments
    ///
    /// * `thresholds` - Minimum values each check must reach to pass.
    ///
    /// # Returns
    ///
    /// * `Ok(DistributionValidator)` - If the thresholds are in range.
    /// * `Err(FundusError)` - If any threshold is out of range.
    pub fn new(thresholds: ValidationThresholds) -> Result<Self, FundusError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// Gets the thresholds this validator screens against.
    pub fn thresholds(&self) -> &ValidationThresholds {
        &self.thresholds
    }

    /// Screens a decoded image.
    ///
    /// The image is resized to the analysis resolution first so the verdict
    /// does not depend on the input dimensions. This never fails; every
    /// decoded image receives a verdict.
    ///
    /// # Arguments
    ///
    /// * `image` - The decoded image to screen.
    ///
    /// # Returns
    ///
    /// * `OODVerdict` - Score, validity, and a reason per failed check.
    pub fn evaluate(&self, image: &RgbImage) -> OODVerdict {
        let resized = resize_to_analysis(image);

        let entropy = shannon_entropy_bits(&intensity_histogram(&resized));
        let color_variance = normalized_color_variance(&resized);
        let falloff = brightness_falloff_fraction(&radial_brightness_profile(&resized));
        let means = channel_means(&resized);
        let channel_total = means[0] + means[1] + means[2];
        let red_ratio = if channel_total > 0.0 {
            means[0] / channel_total
        } else {
            0.0
        };

        let mut score = 0.0f32;
        let mut reasons = Vec::new();

        if entropy >= self.thresholds.min_entropy_bits {
            score += CHECK_SCORE_WEIGHT;
        } else {
            reasons.push("image intensity is too uniform (low histogram entropy)".to_string());
        }

        if color_variance >= self.thresholds.min_color_variance {
            score += CHECK_SCORE_WEIGHT;
        } else {
            reasons.push("color variation does not match a retinal photograph".to_string());
        }

        if falloff >= self.thresholds.min_brightness_falloff {
            score += CHECK_SCORE_WEIGHT;
        } else {
            reasons.push("no circular fundus structure detected".to_string());
        }

        if red_ratio >= self.thresholds.min_red_dominance {
            score += CHECK_SCORE_WEIGHT;
        } else {
            reasons.push("red channel dominance is below the fundus range".to_string());
        }

        let is_valid = score >= VALID_SCORE_THRESHOLD;
        debug!(
            "Distribution screening: entropy={:.2}, variance={:.4}, falloff={:.2}, red={:.2} -> score {:.2}, valid={}",
            entropy, color_variance, falloff, red_ratio, score, is_valid
        );

        OODVerdict {
            is_valid,
            score,
            reasons,
        }
    }

    /// Loads an image from disk and screens it.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the image file.
    ///
    /// # Returns
    ///
    /// * `Ok(OODVerdict)` - The verdict for the decoded image.
    /// * `Err(FundusError)` - If the file cannot be read or decoded.
    pub fn evaluate_path(&self, path: impl AsRef<Path>) -> Result<OODVerdict, FundusError> {
        let image = load_image(path.as_ref())?;
        Ok(self.evaluate(&image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Bright reddish disc fading toward black corners, like a retinal photo.
    fn fundus_like_image() -> RgbImage {
        RgbImage::from_fn(224, 224, |x, y| {
            let dx = x as f32 - 112.0;
            let dy = y as f32 - 112.0;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= 100.0 {
                let brightness = 1.0 - dist / 200.0;
                Rgb([
                    (200.0 * brightness) as u8,
                    (90.0 * brightness) as u8,
                    (50.0 * brightness) as u8,
                ])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_fundus_like_image_is_accepted() {
        let validator = DistributionValidator::default();
        let verdict = validator.evaluate(&fundus_like_image());

        // Entropy: intensities spread over dozens of bins plus a black
        // background peak. Variance: black corners against a bright disc.
        // Falloff: ring means decrease monotonically. Red: 200/340 per pixel.
        assert!(verdict.is_valid);
        assert!((verdict.score - 1.0).abs() < 1e-6);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn test_uniform_gray_image_is_rejected() {
        let validator = DistributionValidator::default();
        let image = RgbImage::from_pixel(224, 224, Rgb([128, 128, 128]));
        let verdict = validator.evaluate(&image);

        // A flat gray frame fails entropy, variance, and falloff. Equal
        // channels give a red ratio of exactly 1/3, which passes.
        assert!(!verdict.is_valid);
        assert!((verdict.score - 0.25).abs() < 1e-6);
        assert_eq!(verdict.reasons.len(), 3);
    }

    #[test]
    fn test_reasons_follow_check_order() {
        let validator = DistributionValidator::default();
        let image = RgbImage::from_pixel(64, 64, Rgb([0, 0, 255]));
        let verdict = validator.evaluate(&image);

        // A flat blue frame fails all four checks.
        assert!(!verdict.is_valid);
        assert!((verdict.score - 0.0).abs() < 1e-6);
        assert_eq!(verdict.reasons.len(), 4);
        assert!(verdict.reasons[0].contains("entropy"));
        assert!(verdict.reasons[1].contains("color variation"));
        assert!(verdict.reasons[2].contains("circular"));
        assert!(verdict.reasons[3].contains("red channel"));
    }

    #[test]
    fn test_verdict_is_resolution_independent() {
        let validator = DistributionValidator::default();
        let small = RgbImage::from_pixel(32, 32, Rgb([128, 128, 128]));
        let large = RgbImage::from_pixel(640, 480, Rgb([128, 128, 128]));

        let small_verdict = validator.evaluate(&small);
        let large_verdict = validator.evaluate(&large);
        assert_eq!(small_verdict.score, large_verdict.score);
        assert_eq!(small_verdict.reasons, large_verdict.reasons);
    }

    #[test]
    fn test_new_rejects_out_of_range_thresholds() {
        let thresholds = ValidationThresholds {
            min_entropy_bits: -1.0,
            ..ValidationThresholds::default()
        };
        assert!(DistributionValidator::new(thresholds).is_err());
    }

    #[test]
    fn test_evaluate_path_missing_file() {
        let validator = DistributionValidator::default();
        let result = validator.evaluate_path("/nonexistent/image.png");
        assert!(result.is_err());
    }
}
