//! Traits defining the classifier boundary.
//!
//! The toolkit never loads or executes a model itself. Callers implement
//! [`Classifier`] over whatever inference backend they use and hand it to the
//! evaluation components.

use crate::core::errors::FundusError;
use crate::core::tensor::Tensor4D;

/// A trained image classifier.
///
/// Implementations receive an encoded input tensor of shape
/// `(1, height, width, 3)` with values in `[0, 1]` and return one probability
/// per class, in vocabulary order. The probabilities are passed through to
/// callers as produced; this crate never renormalizes them.
pub trait Classifier {
    /// Returns the number of classes the classifier scores.
    fn class_count(&self) -> usize;

    /// Runs the classifier on an encoded input.
    ///
    /// # Arguments
    ///
    /// * `input` - The encoded image tensor.
    ///
    /// # Returns
    ///
    /// A Result containing one probability per class, or a FundusError if
    /// the backend fails.
    fn classify(&self, input: &Tensor4D) -> Result<Vec<f32>, FundusError>;
}
