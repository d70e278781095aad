//! Tensor type aliases used across the analysis toolkit.
//!
//! All pixel math in this crate is f32. The aliases here name the shapes the
//! components exchange so signatures stay readable.

/// A 2D tensor of f32 values.
pub type Tensor2D = ndarray::Array2<f32>;

/// A 4D tensor of f32 values.
pub type Tensor4D = ndarray::Array4<f32>;

/// A spatial activation map over the analysis grid, one value per pixel.
///
/// Values are unbounded until normalized into `[0, 1]`.
pub type ActivationMap = Tensor2D;
