//! Heatmap colormap rendering.
//!
//! Maps normalized activation values to the four-segment jet gradient
//! (blue, cyan, green, yellow, red) with an alpha channel that scales
//! with activation strength.

use crate::core::constants::{HEATMAP_ALPHA_FLOOR, HEATMAP_ALPHA_SCALE};
use image::Rgba;

/// Maps a normalized activation value to a jet colormap color.
///
/// The gradient runs blue → cyan over `[0, 0.25)`, cyan → green over
/// `[0.25, 0.5)`, green → yellow over `[0.5, 0.75)`, and yellow → red over
/// `[0.75, 1.0]`. Alpha rises linearly from [`HEATMAP_ALPHA_FLOOR`] at zero
/// activation to full opacity at one, so strong activations dominate the
/// composite.
///
/// # Arguments
///
/// * `value` - The normalized activation; values outside `[0, 1]` are
///   clamped to the nearest endpoint
///
/// # Returns
///
/// The RGBA heatmap color.
pub fn jet_rgba(value: f32) -> Rgba<u8> {
    let value = value.clamp(0.0, 1.0);

    let (r, g, b) = if value < 0.25 {
        // Blue to cyan
        let t = value / 0.25;
        (0, (t * 255.0) as u8, 255)
    } else if value < 0.5 {
        // Cyan to green
        let t = (value - 0.25) / 0.25;
        (0, 255, ((1.0 - t) * 255.0) as u8)
    } else if value < 0.75 {
        // Green to yellow
        let t = (value - 0.5) / 0.25;
        ((t * 255.0) as u8, 255, 0)
    } else {
        // Yellow to red
        let t = (value - 0.75) / 0.25;
        (255, ((1.0 - t) * 255.0) as u8, 0)
    };

    let alpha = (value * HEATMAP_ALPHA_SCALE) as u8 + HEATMAP_ALPHA_FLOOR as u8;
    Rgba([r, g, b, alpha])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jet_endpoints() {
        assert_eq!(jet_rgba(0.0), Rgba([0, 0, 255, 55]));
        assert_eq!(jet_rgba(1.0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_jet_segment_boundaries() {
        assert_eq!(jet_rgba(0.25), Rgba([0, 255, 255, 105]));
        assert_eq!(jet_rgba(0.5), Rgba([0, 255, 0, 155]));
        assert_eq!(jet_rgba(0.75), Rgba([255, 255, 0, 205]));
    }

    #[test]
    fn test_jet_midpoint_of_first_segment() {
        // t = 0.5 inside blue-to-cyan: green ramps to (int)(127.5) = 127.
        assert_eq!(jet_rgba(0.125), Rgba([0, 127, 255, 80]));
    }

    #[test]
    fn test_jet_alpha_rises_with_activation() {
        let low = jet_rgba(0.1)[3];
        let high = jet_rgba(0.9)[3];
        assert!(low < high);
        assert!(low >= 55);
    }

    #[test]
    fn test_jet_clamps_out_of_range_values() {
        // Values past 1.0 would otherwise push the alpha sum over u8::MAX.
        assert_eq!(jet_rgba(1.5), jet_rgba(1.0));
        assert_eq!(jet_rgba(-0.5), jet_rgba(0.0));
    }
}
