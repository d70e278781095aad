//! Utility functions for image handling.
//!
//! This module provides functions for loading images in the analysis
//! toolkit. It includes functions for converting decoded images to RGB,
//! loading an image from a file, and filtering paths by extension.

use crate::core::FundusError;
use image::{DynamicImage, RgbImage};

/// File extensions accepted as raster image inputs, lowercase.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Converts a DynamicImage to an RgbImage.
///
/// This function takes a DynamicImage (which can be in any format) and
/// converts it to an RgbImage (8-bit RGB format). Alpha channels are
/// discarded; every pixel is treated as fully opaque.
///
/// # Arguments
///
/// * `img` - The DynamicImage to convert
///
/// # Returns
///
/// * `RgbImage` - The converted RGB image
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// This function opens an image from the specified file path and converts it
/// to an RgbImage. It handles any image format supported by the image crate.
///
/// # Arguments
///
/// * `path` - A reference to the path of the image file to load
///
/// # Returns
///
/// * `Ok(RgbImage)` - The loaded and converted RGB image
/// * `Err(FundusError)` - An error if the image could not be loaded or converted
///
/// # Errors
///
/// This function will return a `FundusError::ImageLoad` error if the image
/// cannot be loaded from the specified path, or if there is an error during
/// conversion.
pub fn load_image(path: &std::path::Path) -> Result<RgbImage, FundusError> {
    let img = image::open(path).map_err(FundusError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Checks whether a path has a supported raster image extension.
///
/// The comparison is case-insensitive; paths without an extension are not
/// supported.
///
/// # Arguments
///
/// * `path` - The path to check
///
/// # Returns
///
/// True if the extension is one of [`SUPPORTED_IMAGE_EXTENSIONS`].
pub fn is_supported_image(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}
