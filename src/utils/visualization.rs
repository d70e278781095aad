//! Visualization utilities for saliency results.
//!
//! This module provides functions for creating visual representations of
//! saliency analyses, pairing the source photograph with its heatmap overlay
//! in a single panel.
//!
//! # Features
//!
//! - Side-by-side panels with the original image and the saliency overlay
//! - A caption strip for the predicted class and confidence
//! - Configurable fonts and styling
//!
//! # Examples
//!
//! ```rust
//! use fundus_lens::utils::visualization::{saliency_panel, VisualizationConfig};
//! // Assuming you have an original image and a saliency overlay
//! // let config = VisualizationConfig::with_system_font();
//! // let panel = saliency_panel(&original, &overlay, "Glaucoma 87.3%", &config);
//! ```

use ab_glyph::FontVec;
use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::{debug, info};

const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

const BACKGROUND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Configuration for saliency visualization.
///
/// This struct holds settings that control how saliency panels are rendered,
/// including font settings and the caption strip size. You can customize
/// these settings to change the appearance of the visualization output.
pub struct VisualizationConfig {
    /// The font to use for caption rendering. If None, the caption is skipped.
    pub font: Option<FontVec>,

    /// The scale factor for the font. Defaults to 16.0.
    pub font_scale: f32,

    /// The height of the caption strip below the images. Defaults to 24.
    pub caption_height: u32,
}

impl Default for VisualizationConfig {
    /// Creates a default VisualizationConfig with no font, font scale of 16.0,
    /// and a 24 pixel caption strip.
    fn default() -> Self {
        Self {
            font: None,
            font_scale: 16.0,
            caption_height: 24,
        }
    }
}

impl VisualizationConfig {
    /// Creates a VisualizationConfig with a font loaded from the specified path.
    ///
    /// # Arguments
    ///
    /// * `font_path` - Path to the font file to load
    ///
    /// # Returns
    ///
    /// A Result containing the VisualizationConfig if successful, or an error
    /// if the font could not be loaded.
    pub fn with_font_path(font_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let font_data = std::fs::read(font_path)?;
        let font = FontVec::try_from_vec(font_data)
            .map_err(|_| format!("Failed to parse font file: {}", font_path.display()))?;

        Ok(Self {
            font: Some(font),
            ..Self::default()
        })
    }

    /// Creates a VisualizationConfig with a system font.
    ///
    /// This function attempts to load a system font from common locations.
    /// If no system font is found, it falls back to the default configuration.
    ///
    /// # Returns
    ///
    /// A VisualizationConfig with a system font if found, otherwise with
    /// default settings.
    pub fn with_system_font() -> Self {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/System/Library/Fonts/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];

        for path in &font_paths {
            if let Ok(font_data) = std::fs::read(path)
                && let Ok(font) = FontVec::try_from_vec(font_data)
            {
                info!("Loaded system font: {}", path);
                return Self {
                    font: Some(font),
                    ..Self::default()
                };
            }
        }

        debug!("No system font found, caption rendering will be skipped");
        Self::default()
    }
}

/// Creates a saliency panel showing the original image and its overlay side
/// by side.
///
/// The panel places the source photograph on the left and the saliency
/// overlay on the right, with a caption strip underneath. The caption is
/// drawn centered when a font is configured and skipped otherwise.
///
/// # Arguments
///
/// * `original` - The source photograph
/// * `overlay` - The saliency overlay, with the same dimensions as the source
/// * `caption` - Text for the caption strip, typically the predicted class
///   and its confidence
/// * `config` - The VisualizationConfig controlling fonts and layout
///
/// # Returns
///
/// A Result containing the panel image if successful, or an error if the two
/// images differ in size.
pub fn saliency_panel(
    original: &RgbImage,
    overlay: &RgbImage,
    caption: &str,
    config: &VisualizationConfig,
) -> Result<RgbImage, Box<dyn std::error::Error>> {
    let (width, height) = original.dimensions();
    if overlay.dimensions() != (width, height) {
        return Err(format!(
            "overlay dimensions {}x{} do not match the original {}x{}",
            overlay.width(),
            overlay.height(),
            width,
            height
        )
        .into());
    }

    let panel_width = width * 2;
    let panel_height = height + config.caption_height;
    let mut panel = RgbImage::new(panel_width, panel_height);

    imageops::overlay(&mut panel, original, 0, 0);
    imageops::overlay(&mut panel, overlay, width as i64, 0);

    if config.caption_height > 0 && panel_width > 0 {
        let strip = Rect::at(0, height as i32).of_size(panel_width, config.caption_height);
        draw_filled_rect_mut(&mut panel, strip, BACKGROUND_COLOR);
        draw_caption(&mut panel, caption, height, config);
    }

    Ok(panel)
}

/// Draws the caption centered in the strip below the images.
///
/// Rendering is skipped when no font is configured or the caption is empty.
///
/// # Arguments
///
/// * `panel` - The panel image to draw on
/// * `caption` - The caption text
/// * `strip_top` - The y coordinate where the caption strip starts
/// * `config` - Visualization configuration including font settings
fn draw_caption(panel: &mut RgbImage, caption: &str, strip_top: u32, config: &VisualizationConfig) {
    if caption.is_empty() {
        return;
    }
    let Some(ref font) = config.font else { return };

    let text_width = measure_text_width(caption, font, config.font_scale).unwrap_or(0.0);
    let text_x = ((panel.width() as f32 - text_width) / 2.0).max(0.0) as i32;
    let text_y =
        strip_top as i32 + ((config.caption_height as f32 - config.font_scale) / 2.0).max(0.0) as i32;

    draw_text_mut(
        panel,
        TEXT_COLOR,
        text_x,
        text_y,
        config.font_scale,
        font,
        caption,
    );
}

/// Measures the width of text when rendered with a specific font and scale.
///
/// This function calculates the total width of a text string by summing the
/// advance widths of each character when rendered with the specified font
/// and scale.
///
/// # Arguments
///
/// * `text` - The text to measure
/// * `font` - The font to use for measurement
/// * `scale` - The scale at which the font will be rendered
///
/// # Returns
///
/// An Option containing the calculated width, or None if measurement failed.
fn measure_text_width(text: &str, font: &FontVec, scale: f32) -> Option<f32> {
    use ab_glyph::{Font, ScaleFont};

    let scaled_font = font.as_scaled(scale);
    let mut width = 0.0;

    for ch in text.chars() {
        let glyph = scaled_font.scaled_glyph(ch);
        width += scaled_font.h_advance(glyph.id);
    }

    Some(width)
}

/// Creates a saliency panel and saves it to a file.
///
/// This function generates the panel image and saves it to the specified
/// output path. It can optionally use a custom font for caption rendering.
///
/// # Arguments
///
/// * `original` - The source photograph
/// * `overlay` - The saliency overlay
/// * `caption` - Text for the caption strip
/// * `output_path` - The path where the panel image will be saved
/// * `font_path` - Optional path to a custom font file for caption rendering
///
/// # Returns
///
/// A Result indicating success or failure of the visualization process.
pub fn save_saliency_panel(
    original: &RgbImage,
    overlay: &RgbImage,
    caption: &str,
    output_path: &Path,
    font_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = create_visualization_config(font_path);
    let panel = saliency_panel(original, overlay, caption, &config)?;
    panel.save(output_path)?;

    info!("Visualization saved to: {}", output_path.display());
    Ok(())
}

/// Creates a VisualizationConfig with appropriate font settings.
///
/// This function attempts to create a VisualizationConfig with a custom font
/// if specified, falling back to system fonts or default settings if the
/// custom font cannot be loaded.
///
/// # Arguments
///
/// * `font_path` - Optional path to a custom font file
///
/// # Returns
///
/// A VisualizationConfig with the appropriate font settings.
fn create_visualization_config(font_path: Option<&Path>) -> VisualizationConfig {
    match font_path {
        Some(path) => VisualizationConfig::with_font_path(path)
            .inspect(|_| info!("Using custom font: {}", path.display()))
            .inspect_err(|e| {
                debug!(
                    "Failed to load custom font {}: {}. Falling back to system font.",
                    path.display(),
                    e
                )
            })
            .unwrap_or_else(|_| VisualizationConfig::with_system_font()),
        None => VisualizationConfig::with_system_font(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_places_images_side_by_side() {
        let original = RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]));
        let overlay = RgbImage::from_pixel(64, 48, Rgb([200, 100, 50]));
        let config = VisualizationConfig::default();

        let panel = saliency_panel(&original, &overlay, "Healthy", &config).unwrap();
        assert_eq!(panel.dimensions(), (128, 48 + 24));
        assert_eq!(panel.get_pixel(10, 10), &Rgb([10, 20, 30]));
        assert_eq!(panel.get_pixel(64 + 10, 10), &Rgb([200, 100, 50]));
        // The caption strip is white even without a font.
        assert_eq!(panel.get_pixel(5, 48 + 5), &BACKGROUND_COLOR);
    }

    #[test]
    fn test_panel_rejects_mismatched_dimensions() {
        let original = RgbImage::new(64, 48);
        let overlay = RgbImage::new(32, 32);
        let config = VisualizationConfig::default();

        assert!(saliency_panel(&original, &overlay, "Healthy", &config).is_err());
    }

    #[test]
    fn test_zero_caption_height_omits_strip() {
        let original = RgbImage::from_pixel(16, 16, Rgb([1, 2, 3]));
        let overlay = RgbImage::from_pixel(16, 16, Rgb([4, 5, 6]));
        let config = VisualizationConfig {
            caption_height: 0,
            ..VisualizationConfig::default()
        };

        let panel = saliency_panel(&original, &overlay, "Healthy", &config).unwrap();
        assert_eq!(panel.dimensions(), (32, 16));
    }

    #[test]
    fn test_with_system_font_never_panics() {
        let config = VisualizationConfig::with_system_font();
        assert_eq!(config.font_scale, 16.0);
    }
}
