//! Error types for the analysis toolkit.
//!
//! This module defines the errors that can occur while gating, evaluating, or
//! explaining classifier output, including image loading errors, processing
//! errors, classifier errors, and configuration errors. It also provides
//! utility functions for creating these errors with appropriate context.

use thiserror::Error;

/// Enum representing different stages of processing in the analysis toolkit.
///
/// This enum is used to identify which stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred during tensor operations.
    TensorOperation,
    /// Error occurred while encoding an image into classifier input.
    Encoding,
    /// Error occurred during image resizing.
    Resize,
    /// Error occurred while computing an activation map.
    Activation,
    /// Error occurred while rendering or compositing a heatmap.
    Overlay,
    /// Error occurred during batch evaluation.
    Evaluation,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::TensorOperation => write!(f, "tensor operation"),
            ProcessingStage::Encoding => write!(f, "encoding"),
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::Activation => write!(f, "activation"),
            ProcessingStage::Overlay => write!(f, "overlay"),
            ProcessingStage::Evaluation => write!(f, "evaluation"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Enum representing the errors that can occur in the analysis toolkit.
///
/// This enum defines all the error types that can occur while validating
/// inputs, evaluating predictions, or generating saliency overlays.
#[derive(Error, Debug)]
pub enum FundusError {
    /// Error occurred while loading or decoding an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error reported by the classifier backend.
    #[error("classification")]
    Classification(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error indicating a label that is not part of the class vocabulary.
    #[error("label '{label}' is not in the class vocabulary ({context})")]
    VocabularyMismatch {
        /// The unknown label.
        label: String,
        /// Where the label was encountered.
        context: String,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Implementation of FundusError with utility functions for creating errors.
impl FundusError {
    /// Creates a FundusError for tensor operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn tensor_operation(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::TensorOperation,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a FundusError for encoding operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn encoding_error(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::Encoding,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a FundusError for resize operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn resize_error(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::Resize,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a FundusError for activation-map operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn activation_error(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::Activation,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a FundusError for heatmap overlay operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn overlay_error(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::Overlay,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a FundusError for batch evaluation operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn evaluation_error(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::Evaluation,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a FundusError for processing operations.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a FundusError for classifier-side failures.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying error that caused this error.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn classification_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Classification(Box::new(error))
    }

    /// Creates a FundusError for a label missing from the vocabulary.
    ///
    /// # Arguments
    ///
    /// * `label` - The unknown label.
    /// * `context` - Where the label was encountered.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn vocabulary_mismatch(label: impl Into<String>, context: impl Into<String>) -> Self {
        Self::VocabularyMismatch {
            label: label.into(),
            context: context.into(),
        }
    }

    /// Creates a FundusError for invalid input.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the invalid input.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a FundusError for configuration errors.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the configuration error.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a FundusError for validation errors.
    ///
    /// # Arguments
    ///
    /// * `component` - The component where the error occurred.
    /// * `field` - The field where the error occurred.
    /// * `expected` - The expected value.
    /// * `actual` - The actual value.
    ///
    /// # Returns
    ///
    /// A FundusError instance.
    pub fn validation_error(component: &str, field: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidInput {
            message: format!(
                "Validation failed in {}: field '{}' expected {}, but got '{}'",
                component, field, expected, actual
            ),
        }
    }
}

/// Implementation of From<image::ImageError> for FundusError.
///
/// This allows image::ImageError to be automatically converted to FundusError.
impl From<image::ImageError> for FundusError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

/// Implementation of From<crate::core::config::ConfigError> for FundusError.
///
/// This allows crate::core::config::ConfigError to be automatically converted to FundusError.
impl From<crate::core::config::ConfigError> for FundusError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}
