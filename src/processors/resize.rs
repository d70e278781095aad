//! Resizing utilities for analysis and rendering.
//!
//! All pixel-statistics computation happens on a fixed working grid; heatmap
//! rendering goes the other way and upscales back to the source resolution.
//! Both directions use bilinear filtering.

use crate::core::constants::ANALYSIS_INPUT_SHAPE;
use image::{RgbImage, RgbaImage, imageops};

/// Downscales an image to the analysis working grid.
///
/// The output is always exactly [`ANALYSIS_INPUT_SHAPE`]; an image already at
/// that size is returned as a copy without resampling.
///
/// # Arguments
///
/// * `img` - The image to resize
///
/// # Returns
///
/// The image resampled to the analysis resolution.
pub fn resize_to_analysis(img: &RgbImage) -> RgbImage {
    let (width, height) = ANALYSIS_INPUT_SHAPE;
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, imageops::FilterType::Triangle)
}

/// Upscales an RGBA image to the given dimensions with bilinear filtering.
///
/// Used to bring a rendered heatmap back to the source image's resolution.
/// The alpha channel is interpolated like the color channels.
///
/// # Arguments
///
/// * `img` - The image to resize
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
///
/// # Returns
///
/// The resampled image.
pub fn upscale_rgba(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, imageops::FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    #[test]
    fn test_resize_to_analysis_dimensions() {
        let img = RgbImage::from_pixel(640, 480, Rgb([120, 40, 20]));
        let resized = resize_to_analysis(&img);
        assert_eq!(resized.dimensions(), (224, 224));
    }

    #[test]
    fn test_resize_to_analysis_preserves_uniform_color() {
        let img = RgbImage::from_pixel(100, 60, Rgb([200, 100, 50]));
        let resized = resize_to_analysis(&img);
        assert_eq!(*resized.get_pixel(112, 112), Rgb([200, 100, 50]));
    }

    #[test]
    fn test_resize_to_analysis_passthrough_at_target_size() {
        let img = RgbImage::from_pixel(224, 224, Rgb([1, 2, 3]));
        let resized = resize_to_analysis(&img);
        assert_eq!(resized, img);
    }

    #[test]
    fn test_upscale_rgba_keeps_solid_pixels() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 128]));
        let upscaled = upscale_rgba(&img, 16, 16);
        assert_eq!(upscaled.dimensions(), (16, 16));
        assert_eq!(*upscaled.get_pixel(8, 8), Rgba([255, 0, 0, 128]));
    }
}
