//! Types used in image processing operations
//!
//! This module defines shared enums for the image processing stages of the
//! analysis toolkit.

/// Specifies the order of channels in an image tensor
#[derive(Debug, Clone)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (common in PyTorch)
    CHW,
    /// Height, Width, Channel order (common in TensorFlow)
    HWC,
}
