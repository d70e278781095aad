//! Pixel-statistics primitives shared by the analysis engines.
//!
//! These functions compute the histogram, entropy, channel variance, radial
//! brightness, and local texture measures that the input-distribution checks
//! and the activation map are built from. Grayscale intensity is always the
//! mean of the three channels, each channel extracted individually.

use crate::core::constants::{HISTOGRAM_BINS, RADIAL_RING_COUNT};
use image::RgbImage;

/// Integer grayscale intensity of a pixel, the mean of its three channels.
///
/// # Arguments
///
/// * `r` - Red channel value
/// * `g` - Green channel value
/// * `b` - Blue channel value
///
/// # Returns
///
/// The mean of the three channels, truncated toward zero.
#[inline]
pub fn grayscale_intensity(r: u8, g: u8, b: u8) -> u32 {
    (r as u32 + g as u32 + b as u32) / 3
}

/// Builds a 256-bin histogram of grayscale intensity over an image.
///
/// # Arguments
///
/// * `img` - The image to histogram
///
/// # Returns
///
/// Per-bin pixel counts.
pub fn intensity_histogram(img: &RgbImage) -> [u32; HISTOGRAM_BINS] {
    let mut histogram = [0u32; HISTOGRAM_BINS];
    for pixel in img.pixels() {
        let gray = grayscale_intensity(pixel[0], pixel[1], pixel[2]);
        histogram[gray as usize] += 1;
    }
    histogram
}

/// Computes the Shannon entropy of a histogram, in bits.
///
/// Empty bins contribute nothing; an empty histogram has zero entropy.
///
/// # Arguments
///
/// * `histogram` - Per-bin counts
///
/// # Returns
///
/// The entropy in bits.
pub fn shannon_entropy_bits(histogram: &[u32]) -> f32 {
    let total: u64 = histogram.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0.0;
    }

    let mut entropy = 0.0f64;
    for &count in histogram {
        if count > 0 {
            let probability = count as f64 / total as f64;
            entropy -= probability * probability.log2();
        }
    }
    entropy as f32
}

/// Computes the mean of each color channel over an image.
///
/// # Arguments
///
/// * `img` - The image to average
///
/// # Returns
///
/// The per-channel means in `[R, G, B]` order; all zeros for an empty image.
pub fn channel_means(img: &RgbImage) -> [f32; 3] {
    let total_pixels = (img.width() as u64 * img.height() as u64) as f64;
    if total_pixels == 0.0 {
        return [0.0; 3];
    }

    let mut sums = [0.0f64; 3];
    for pixel in img.pixels() {
        for (c, sum) in sums.iter_mut().enumerate() {
            *sum += pixel[c] as f64;
        }
    }

    [
        (sums[0] / total_pixels) as f32,
        (sums[1] / total_pixels) as f32,
        (sums[2] / total_pixels) as f32,
    ]
}

/// Computes the normalized sum of per-channel variances over an image.
///
/// Each channel's variance is computed against its own mean, summed across
/// the three channels, and divided by `3 * 255^2` so the result lands in
/// `[0, 1]`.
///
/// # Arguments
///
/// * `img` - The image to measure
///
/// # Returns
///
/// The normalized color variance; zero for an empty or uniform image.
pub fn normalized_color_variance(img: &RgbImage) -> f32 {
    let total_pixels = (img.width() as u64 * img.height() as u64) as f64;
    if total_pixels == 0.0 {
        return 0.0;
    }

    let means = channel_means(img);

    let mut variances = [0.0f64; 3];
    for pixel in img.pixels() {
        for (c, variance) in variances.iter_mut().enumerate() {
            let diff = pixel[c] as f64 - means[c] as f64;
            *variance += diff * diff;
        }
    }

    let sum: f64 = variances.iter().map(|v| v / total_pixels).sum();
    (sum / (3.0 * 255.0 * 255.0)) as f32
}

/// Computes the mean grayscale brightness of concentric rings around the
/// image center.
///
/// Every pixel is assigned to one of [`RADIAL_RING_COUNT`] rings by its
/// distance from the center, normalized by the center-to-corner distance so
/// the outermost ring reaches the image corners. Rings that receive no
/// pixels report zero brightness.
///
/// # Arguments
///
/// * `img` - The image to profile
///
/// # Returns
///
/// Mean brightness per ring, innermost first.
pub fn radial_brightness_profile(img: &RgbImage) -> [f32; RADIAL_RING_COUNT] {
    let (width, height) = img.dimensions();
    let center_x = (width / 2) as f64;
    let center_y = (height / 2) as f64;
    let max_distance = center_x.hypot(center_y);

    let mut sums = [0.0f64; RADIAL_RING_COUNT];
    let mut counts = [0u32; RADIAL_RING_COUNT];

    for (x, y, pixel) in img.enumerate_pixels() {
        let distance = (x as f64 - center_x).hypot(y as f64 - center_y);
        let ring = if max_distance > 0.0 {
            ((distance / max_distance * RADIAL_RING_COUNT as f64) as usize)
                .min(RADIAL_RING_COUNT - 1)
        } else {
            0
        };

        sums[ring] += grayscale_intensity(pixel[0], pixel[1], pixel[2]) as f64;
        counts[ring] += 1;
    }

    let mut profile = [0.0f32; RADIAL_RING_COUNT];
    for (i, (sum, &count)) in sums.iter().zip(counts.iter()).enumerate() {
        if count > 0 {
            profile[i] = (sum / count as f64) as f32;
        }
    }
    profile
}

/// Computes the fraction of adjacent ring pairs whose brightness strictly
/// decreases outward.
///
/// # Arguments
///
/// * `profile` - Ring brightness values, innermost first
///
/// # Returns
///
/// The decreasing-pair fraction in `[0, 1]`; zero for profiles shorter than
/// two rings.
pub fn brightness_falloff_fraction(profile: &[f32]) -> f32 {
    if profile.len() < 2 {
        return 0.0;
    }

    let falling = profile
        .windows(2)
        .filter(|pair| pair[0] > pair[1])
        .count();
    falling as f32 / (profile.len() - 1) as f32
}

/// Computes the normalized standard deviation of grayscale intensity in the
/// 3x3 neighborhood of a pixel.
///
/// Neighborhood indices are clamped to the image bounds, so edge pixels
/// sample their own row or column more than once. The result is divided by
/// 255 so it lands in `[0, 0.5]`.
///
/// # Arguments
///
/// * `img` - The source image
/// * `x` - Pixel x coordinate
/// * `y` - Pixel y coordinate
///
/// # Returns
///
/// The normalized local standard deviation.
pub fn local_deviation(img: &RgbImage, x: u32, y: u32) -> f32 {
    let (width, height) = img.dimensions();
    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;

    let mut window = [0.0f32; 9];
    let mut i = 0;
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            let nx = (x as i64 + dx).clamp(0, max_x) as u32;
            let ny = (y as i64 + dy).clamp(0, max_y) as u32;
            let pixel = img.get_pixel(nx, ny);
            window[i] = grayscale_intensity(pixel[0], pixel[1], pixel[2]) as f32;
            i += 1;
        }
    }

    let mean = window.iter().sum::<f32>() / 9.0;
    let variance = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / 9.0;
    variance.sqrt() / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_grayscale_intensity_truncates() {
        assert_eq!(grayscale_intensity(255, 255, 255), 255);
        assert_eq!(grayscale_intensity(0, 0, 0), 0);
        // (10 + 20 + 31) / 3 = 20 with truncation
        assert_eq!(grayscale_intensity(10, 20, 31), 20);
    }

    #[test]
    fn test_intensity_histogram_uniform_image() {
        let img = RgbImage::from_pixel(8, 8, Rgb([90, 90, 90]));
        let histogram = intensity_histogram(&img);
        assert_eq!(histogram[90], 64);
        assert_eq!(histogram.iter().sum::<u32>(), 64);
    }

    #[test]
    fn test_shannon_entropy_of_uniform_image_is_zero() {
        let img = RgbImage::from_pixel(16, 16, Rgb([40, 40, 40]));
        let histogram = intensity_histogram(&img);
        assert_eq!(shannon_entropy_bits(&histogram), 0.0);
    }

    #[test]
    fn test_shannon_entropy_two_equal_bins_is_one_bit() {
        let mut histogram = [0u32; 256];
        histogram[0] = 100;
        histogram[255] = 100;
        let entropy = shannon_entropy_bits(&histogram);
        assert!((entropy - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shannon_entropy_empty_histogram() {
        let histogram = [0u32; 256];
        assert_eq!(shannon_entropy_bits(&histogram), 0.0);
    }

    #[test]
    fn test_channel_means_exact() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([10, 20, 30]));
        img.put_pixel(1, 0, Rgb([30, 40, 50]));
        let means = channel_means(&img);
        assert_eq!(means, [20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_normalized_color_variance_uniform_is_zero() {
        let img = RgbImage::from_pixel(10, 10, Rgb([128, 64, 32]));
        assert_eq!(normalized_color_variance(&img), 0.0);
    }

    #[test]
    fn test_normalized_color_variance_black_white() {
        // Half black, half white: each channel has variance 255^2 / 4,
        // so the normalized sum is (3 * 255^2 / 4) / (3 * 255^2) = 0.25.
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        let variance = normalized_color_variance(&img);
        assert!((variance - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_radial_profile_bright_center_falls_off() {
        // Bright disk in the center of a dark field.
        let mut img = RgbImage::from_pixel(101, 101, Rgb([10, 10, 10]));
        for y in 0..101u32 {
            for x in 0..101u32 {
                let dx = x as f32 - 50.0;
                let dy = y as f32 - 50.0;
                if (dx * dx + dy * dy).sqrt() < 20.0 {
                    img.put_pixel(x, y, Rgb([240, 240, 240]));
                }
            }
        }
        let profile = radial_brightness_profile(&img);
        assert!(profile[0] > profile[1]);
        assert!(brightness_falloff_fraction(&profile) >= 0.25);
    }

    #[test]
    fn test_brightness_falloff_fraction_counts_pairs() {
        let profile = [4.0, 3.0, 3.0, 2.0, 1.0];
        // Three of four adjacent pairs strictly decrease.
        assert!((brightness_falloff_fraction(&profile) - 0.75).abs() < 1e-6);
        assert_eq!(brightness_falloff_fraction(&[1.0]), 0.0);
    }

    #[test]
    fn test_local_deviation_uniform_is_zero() {
        let img = RgbImage::from_pixel(5, 5, Rgb([77, 77, 77]));
        assert_eq!(local_deviation(&img, 2, 2), 0.0);
        assert_eq!(local_deviation(&img, 0, 0), 0.0);
    }

    #[test]
    fn test_local_deviation_detects_edges() {
        let mut img = RgbImage::from_pixel(5, 5, Rgb([0, 0, 0]));
        for y in 0..5 {
            img.put_pixel(3, y, Rgb([255, 255, 255]));
            img.put_pixel(4, y, Rgb([255, 255, 255]));
        }
        assert!(local_deviation(&img, 2, 2) > 0.0);
        assert_eq!(local_deviation(&img, 0, 2), 0.0);
    }
}
