//! Utility functions for the analysis toolkit.
//!
//! This module provides various utility functions used throughout the
//! toolkit, including image loading utilities, visualization helpers, and
//! logging setup.

pub mod image;
#[cfg(feature = "visualization")]
pub mod visualization;

// Re-export image processing functions
pub use image::{SUPPORTED_IMAGE_EXTENSIONS, dynamic_to_rgb, is_supported_image, load_image};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
