//! Image-to-tensor encoding for the classifier boundary.
//!
//! This module converts RGB images into the floating-point tensors a
//! classifier consumes. The boundary contract is height-width-channel order
//! with values scaled into the unit interval, but the encoder also supports
//! channel-first layouts and mean/std normalization for backends that need
//! them.

use crate::core::FundusError;
use crate::processors::types::ChannelOrder;
use image::RgbImage;
use rayon::prelude::*;

/// Encodes images into classifier input tensors.
///
/// This struct encapsulates the parameters needed to turn pixel data into
/// model input, including scaling factors, mean values, standard deviations,
/// and channel ordering. It provides methods to encode single images or
/// batches of images.
#[derive(Debug)]
pub struct InputEncoder {
    /// Scaling factors for each channel (alpha = scale / std)
    pub alpha: Vec<f32>,
    /// Offset values for each channel (beta = -mean / std)
    pub beta: Vec<f32>,
    /// Channel ordering (CHW or HWC)
    pub order: ChannelOrder,
}

impl InputEncoder {
    /// Creates a new InputEncoder instance with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `scale` - Optional scaling factor (defaults to 1.0/255.0)
    /// * `mean` - Optional mean values for each channel (defaults to [0.0, 0.0, 0.0])
    /// * `std` - Optional standard deviation values for each channel (defaults to [1.0, 1.0, 1.0])
    /// * `order` - Optional channel ordering (defaults to HWC)
    ///
    /// # Returns
    ///
    /// A Result containing the new InputEncoder instance or a FundusError if validation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Scale is less than or equal to 0
    /// * Mean or std vectors don't have exactly 3 elements
    /// * Any standard deviation value is less than or equal to 0
    pub fn new(
        scale: Option<f32>,
        mean: Option<Vec<f32>>,
        std: Option<Vec<f32>>,
        order: Option<ChannelOrder>,
    ) -> Result<Self, FundusError> {
        let scale = scale.unwrap_or(1.0 / 255.0);
        let mean = mean.unwrap_or_else(|| vec![0.0, 0.0, 0.0]);
        let std = std.unwrap_or_else(|| vec![1.0, 1.0, 1.0]);
        let order = order.unwrap_or(ChannelOrder::HWC);

        if scale <= 0.0 {
            return Err(FundusError::ConfigError {
                message: "Scale must be greater than 0".to_string(),
            });
        }

        if mean.len() != 3 {
            return Err(FundusError::ConfigError {
                message: "Mean must have exactly 3 elements for RGB".to_string(),
            });
        }

        if std.len() != 3 {
            return Err(FundusError::ConfigError {
                message: "Std must have exactly 3 elements for RGB".to_string(),
            });
        }

        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(FundusError::ConfigError {
                    message: format!(
                        "Standard deviation at index {i} must be greater than 0, got {s}"
                    ),
                });
            }
        }

        let alpha: Vec<f32> = std.iter().map(|s| scale / s).collect();
        let beta: Vec<f32> = mean.iter().zip(&std).map(|(m, s)| -m / s).collect();

        Ok(Self { alpha, beta, order })
    }

    /// Creates an InputEncoder for the standard classifier boundary.
    ///
    /// This maps 8-bit pixel values into `[0, 1]` in height-width-channel
    /// order with no mean/std adjustment:
    /// * Scale: 1.0/255.0
    /// * Mean: [0.0, 0.0, 0.0]
    /// * Std: [1.0, 1.0, 1.0]
    /// * Order: HWC
    ///
    /// # Returns
    ///
    /// A Result containing the new InputEncoder instance or a FundusError.
    pub fn unit_interval() -> Result<Self, FundusError> {
        Self::new(
            Some(1.0 / 255.0),
            Some(vec![0.0, 0.0, 0.0]),
            Some(vec![1.0, 1.0, 1.0]),
            Some(ChannelOrder::HWC),
        )
    }

    /// Validates the configuration of the InputEncoder instance.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a FundusError if validation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Alpha or beta vectors don't have exactly 3 elements
    /// * Any alpha or beta value is not finite
    pub fn validate_config(&self) -> Result<(), FundusError> {
        if self.alpha.len() != 3 || self.beta.len() != 3 {
            return Err(FundusError::ConfigError {
                message: "Alpha and beta must have exactly 3 elements for RGB".to_string(),
            });
        }

        for (i, &alpha) in self.alpha.iter().enumerate() {
            if !alpha.is_finite() {
                return Err(FundusError::ConfigError {
                    message: format!("Alpha value at index {i} is not finite: {alpha}"),
                });
            }
        }

        for (i, &beta) in self.beta.iter().enumerate() {
            if !beta.is_finite() {
                return Err(FundusError::ConfigError {
                    message: format!("Beta value at index {i} is not finite: {beta}"),
                });
            }
        }

        Ok(())
    }

    /// Fills a pre-sized slice with the encoded pixels of one image.
    fn encode_into(&self, img: &RgbImage, out: &mut [f32]) {
        let (width, height) = img.dimensions();
        let channels = 3u32;

        match self.order {
            ChannelOrder::CHW => {
                for c in 0..channels {
                    for y in 0..height {
                        for x in 0..width {
                            let pixel = img.get_pixel(x, y);
                            let channel_value = pixel[c as usize] as f32;
                            let dst_idx = (c * height * width + y * width + x) as usize;

                            out[dst_idx] =
                                channel_value * self.alpha[c as usize] + self.beta[c as usize];
                        }
                    }
                }
            }
            ChannelOrder::HWC => {
                for y in 0..height {
                    for x in 0..width {
                        let pixel = img.get_pixel(x, y);
                        for c in 0..channels {
                            let channel_value = pixel[c as usize] as f32;
                            let dst_idx = (y * width * channels + x * channels + c) as usize;

                            out[dst_idx] =
                                channel_value * self.alpha[c as usize] + self.beta[c as usize];
                        }
                    }
                }
            }
        }
    }

    /// Encodes a single image into a 4D input tensor.
    ///
    /// The batch dimension of the result is always 1; the remaining axes
    /// follow the configured channel order.
    ///
    /// # Arguments
    ///
    /// * `img` - The image to encode
    ///
    /// # Returns
    ///
    /// A Result containing the encoded tensor or a FundusError.
    pub fn encode(&self, img: &RgbImage) -> Result<crate::core::Tensor4D, FundusError> {
        let (width, height) = img.dimensions();
        let channels = 3usize;

        let mut result = vec![0.0f32; channels * (height * width) as usize];
        self.encode_into(img, &mut result);

        let shape = match self.order {
            ChannelOrder::CHW => (1, channels, height as usize, width as usize),
            ChannelOrder::HWC => (1, height as usize, width as usize, channels),
        };

        ndarray::Array4::from_shape_vec(shape, result)
            .map_err(|e| FundusError::tensor_operation("Failed to create input tensor", e))
    }

    /// Encodes a batch of images into a single 4D input tensor.
    ///
    /// # Arguments
    ///
    /// * `imgs` - The images to encode
    ///
    /// # Returns
    ///
    /// A Result containing the encoded batch tensor or a FundusError.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Images in the batch don't all have the same dimensions
    pub fn encode_batch(&self, imgs: &[RgbImage]) -> Result<crate::core::Tensor4D, FundusError> {
        if imgs.is_empty() {
            return Ok(ndarray::Array4::zeros((0, 0, 0, 0)));
        }

        let batch_size = imgs.len();

        let dimensions: Vec<_> = imgs.iter().map(|img| img.dimensions()).collect();
        let (first_width, first_height) = dimensions[0];
        for (i, &(width, height)) in dimensions.iter().enumerate() {
            if width != first_width || height != first_height {
                return Err(FundusError::InvalidInput {
                    message: format!(
                        "All images in batch must have the same dimensions. Image 0: {first_width}x{first_height}, Image {i}: {width}x{height}"
                    ),
                });
            }
        }

        let (width, height) = (first_width, first_height);
        let channels = 3usize;
        let img_size = channels * (height * width) as usize;

        let mut result = vec![0.0f32; batch_size * img_size];

        if batch_size <= 1 {
            // Avoid rayon overhead for single-image batches
            self.encode_into(&imgs[0], &mut result[0..img_size]);
        } else {
            result
                .par_chunks_mut(img_size)
                .enumerate()
                .for_each(|(batch_idx, batch_slice)| {
                    self.encode_into(&imgs[batch_idx], batch_slice);
                });
        }

        let shape = match self.order {
            ChannelOrder::CHW => (batch_size, channels, height as usize, width as usize),
            ChannelOrder::HWC => (batch_size, height as usize, width as usize, channels),
        };

        ndarray::Array4::from_shape_vec(shape, result)
            .map_err(|e| FundusError::tensor_operation("Failed to create batch input tensor", e))
    }
}
