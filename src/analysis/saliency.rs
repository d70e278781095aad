//! Saliency overlays for classified fundus images.
//!
//! [`SaliencyMapGenerator`] renders a heatmap of structurally salient image
//! regions and composites it over the source photograph. The map is a proxy
//! built from channel intensity and local texture rather than from model
//! gradients, so it needs no access to classifier internals and works with
//! any [`crate::core::traits::Classifier`] implementation.
//!
//! Rendering is best effort: whatever goes wrong, the caller gets an image
//! back. Failures are logged and the source image is returned unchanged.

use image::{Rgb, RgbImage, RgbaImage};
use itertools::Itertools;
use tracing::{debug, warn};

use crate::core::config::{ConfigValidator, SaliencyConfig};
use crate::core::errors::FundusError;
use crate::core::tensor::ActivationMap;
use crate::processors::stats::local_deviation;
use crate::processors::{jet_rgba, resize_to_analysis, upscale_rgba};

/// Renders approximate-attention heatmaps over source images.
///
/// The pipeline runs at the fixed analysis resolution and upsamples the
/// finished heatmap back to the source dimensions, so the cost is flat
/// regardless of input size.
#[derive(Debug, Clone)]
pub struct SaliencyMapGenerator {
    config: SaliencyConfig,
}

impl Default for SaliencyMapGenerator {
    fn default() -> Self {
        Self {
            config: SaliencyConfig::default(),
        }
    }
}

impl SaliencyMapGenerator {
    /// Creates a generator with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Channel weights, texture weight, and blend strength.
    ///
    /// # Returns
    ///
    /// * `Ok(SaliencyMapGenerator)` - If the configuration is in range.
    /// * `Err(FundusError)` - If any weight is out of range.
    pub fn new(config: SaliencyConfig) -> Result<Self, FundusError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Gets the configuration this generator renders with.
    pub fn config(&self) -> &SaliencyConfig {
        &self.config
    }

    /// Renders the saliency overlay for an image.
    ///
    /// The returned image always has the source dimensions. If any rendering
    /// step fails, the failure is logged at `warn` level and the source image
    /// is returned unchanged, so callers can display the result without
    /// checking for errors.
    ///
    /// # Arguments
    ///
    /// * `image` - The source image to explain.
    /// * `target_class` - Position of the class being explained, recorded in
    ///   the rendering log.
    ///
    /// # Returns
    ///
    /// The source image with the heatmap composited on top, or the source
    /// image unchanged if rendering failed.
    pub fn generate(&self, image: &RgbImage, target_class: usize) -> RgbImage {
        debug!("Rendering saliency overlay for class {}", target_class);
        match self.render(image) {
            Ok(overlay) => overlay,
            Err(error) => {
                warn!("Saliency rendering failed, returning the source image: {}", error);
                image.clone()
            }
        }
    }

    fn render(&self, image: &RgbImage) -> Result<RgbImage, FundusError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(FundusError::invalid_input(
                "cannot render a saliency overlay for an empty image",
            ));
        }

        let resized = resize_to_analysis(image);
        let mut map = self.activation_map(&resized);
        map = Self::smooth(&map);
        Self::normalize(&mut map);

        let heatmap = Self::heatmap(&map);
        let heatmap = upscale_rgba(&heatmap, image.width(), image.height());
        Ok(self.composite(image, &heatmap))
    }

    /// Scores every pixel by weighted channel intensity plus local texture.
    fn activation_map(&self, image: &RgbImage) -> ActivationMap {
        let (width, height) = image.dimensions();
        let mut map = ActivationMap::zeros((height as usize, width as usize));

        for y in 0..height {
            for x in 0..width {
                let pixel = image.get_pixel(x, y);
                let channel_term = self.config.red_weight * pixel[0] as f32 / 255.0
                    + self.config.green_weight * pixel[1] as f32 / 255.0
                    + self.config.blue_weight * pixel[2] as f32 / 255.0;
                let texture_term = self.config.variance_weight * local_deviation(image, x, y);
                map[[y as usize, x as usize]] = channel_term + texture_term;
            }
        }

        map
    }

    /// Applies one 3x3 binomial filter pass.
    ///
    /// Only interior cells are filtered; the one-cell border keeps its zero
    /// initialization.
    fn smooth(map: &ActivationMap) -> ActivationMap {
        const KERNEL: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];

        let (rows, cols) = map.dim();
        let mut smoothed = ActivationMap::zeros((rows, cols));
        if rows < 3 || cols < 3 {
            return smoothed;
        }

        for y in 1..rows - 1 {
            for x in 1..cols - 1 {
                let mut acc = 0.0f32;
                for (ky, kernel_row) in KERNEL.iter().enumerate() {
                    for (kx, &weight) in kernel_row.iter().enumerate() {
                        acc += weight * map[[y + ky - 1, x + kx - 1]];
                    }
                }
                smoothed[[y, x]] = acc / 16.0;
            }
        }

        smoothed
    }

    /// Rescales the map to `[0, 1]`. A constant map collapses to all zeros.
    fn normalize(map: &mut ActivationMap) {
        let Some((min, max)) = map.iter().copied().minmax().into_option() else {
            return;
        };

        let range = max - min;
        if range == 0.0 {
            map.fill(0.0);
            return;
        }
        map.mapv_inplace(|value| (value - min) / range);
    }

    fn heatmap(map: &ActivationMap) -> RgbaImage {
        let (rows, cols) = map.dim();
        RgbaImage::from_fn(cols as u32, rows as u32, |x, y| {
            jet_rgba(map[[y as usize, x as usize]])
        })
    }

    /// Source-over composite of the heatmap onto the opaque base image.
    ///
    /// The heatmap's per-pixel alpha is scaled by the configured blend
    /// strength before blending.
    fn composite(&self, base: &RgbImage, overlay: &RgbaImage) -> RgbImage {
        RgbImage::from_fn(base.width(), base.height(), |x, y| {
            let under = base.get_pixel(x, y);
            let over = overlay.get_pixel(x, y);
            let alpha = over[3] as f32 / 255.0 * self.config.blend_strength;

            let mut blended = [0u8; 3];
            for (channel, slot) in blended.iter_mut().enumerate() {
                let value =
                    over[channel] as f32 * alpha + under[channel] as f32 * (1.0 - alpha);
                *slot = value.round() as u8;
            }
            Rgb(blended)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::ANALYSIS_INPUT_SHAPE;

    #[test]
    fn test_overlay_keeps_source_dimensions() {
        let generator = SaliencyMapGenerator::default();
        let image = RgbImage::from_fn(100, 80, |x, _| Rgb([(x * 2) as u8, 40, 40]));
        let overlay = generator.generate(&image, 0);
        assert_eq!(overlay.dimensions(), (100, 80));
    }

    #[test]
    fn test_uniform_image_overlay_is_deterministic() {
        let generator = SaliencyMapGenerator::default();
        let (width, height) = ANALYSIS_INPUT_SHAPE;
        let image = RgbImage::from_pixel(width, height, Rgb([128, 128, 128]));
        let overlay = generator.generate(&image, 0);

        // Smoothing zeroes the border while the interior keeps a constant
        // activation, so normalization maps the interior to 1.0 and the
        // border to 0.0. Interior: jet(1.0) = (255, 0, 0, 255) blended at
        // 0.5 over gray 128 gives (192, 64, 64). Border: jet(0.0) =
        // (0, 0, 255, 55) blended at 55/255 * 0.5 gives (114, 114, 142).
        assert_eq!(overlay.get_pixel(112, 112), &Rgb([192, 64, 64]));
        assert_eq!(overlay.get_pixel(0, 0), &Rgb([114, 114, 142]));
    }

    #[test]
    fn test_bright_regions_draw_warmer_colors() {
        let generator = SaliencyMapGenerator::default();
        let (width, height) = ANALYSIS_INPUT_SHAPE;
        // Dark on the left, bright on the right.
        let image = RgbImage::from_fn(width, height, |x, _| {
            let level = (x * 255 / (width - 1)) as u8;
            Rgb([level, level, level])
        });
        let overlay = generator.generate(&image, 0);

        // The cold end of the palette tints toward blue, the hot end toward
        // red, regardless of the underlying gray level.
        let dark_side = overlay.get_pixel(30, 112);
        let bright_side = overlay.get_pixel(200, 112);
        assert!(dark_side[2] > dark_side[0]);
        assert!(bright_side[0] > bright_side[2]);
    }

    #[test]
    fn test_empty_image_returned_unchanged() {
        let generator = SaliencyMapGenerator::default();
        let image = RgbImage::new(0, 0);
        let overlay = generator.generate(&image, 3);
        assert_eq!(overlay.dimensions(), (0, 0));
    }

    #[test]
    fn test_new_rejects_out_of_range_blend() {
        let config = SaliencyConfig {
            blend_strength: 1.5,
            ..SaliencyConfig::default()
        };
        assert!(SaliencyMapGenerator::new(config).is_err());
    }

    #[test]
    fn test_normalize_constant_map_collapses_to_zero() {
        let mut map = ActivationMap::from_elem((4, 4), 0.7);
        SaliencyMapGenerator::normalize(&mut map);
        assert!(map.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_smooth_keeps_zero_border() {
        let map = ActivationMap::from_elem((5, 5), 1.0);
        let smoothed = SaliencyMapGenerator::smooth(&map);
        assert_eq!(smoothed[[0, 2]], 0.0);
        assert_eq!(smoothed[[4, 2]], 0.0);
        assert_eq!(smoothed[[2, 0]], 0.0);
        // Interior of a constant map keeps the constant.
        assert!((smoothed[[2, 2]] - 1.0).abs() < 1e-6);
    }
}
