//! # Fundus Lens
//!
//! A Rust toolkit for analyzing fundus image classifiers after the fact:
//! screening inputs before they reach the model, scoring predictions over
//! labeled datasets, and rendering saliency overlays that show where an
//! image drove the decision.
//!
//! ## Features
//!
//! - Input-distribution screening with four statistical checks
//! - Batch evaluation over directory-per-class datasets
//! - Accuracy, per-class precision, recall, and F1 with a confusion matrix
//! - Saliency heatmaps composited over the source photograph
//! - Classifier-agnostic: any backend behind a single trait
//!
//! ## Components
//!
//! - **Distribution Validator**: Reject images that do not look like
//!   retinal photographs before classification
//! - **Evaluation Runner**: Classify labeled datasets and single files
//! - **Metrics Engine**: Turn completed runs into metrics and reports
//! - **Saliency Generator**: Explain a prediction with a heatmap overlay
//!
//! ## Modules
//!
//! * [`core`] - Configuration, error handling, constants, and the
//!   classifier trait
//! * [`domain`] - Vocabulary and prediction value objects
//! * [`analysis`] - The screening, metrics, and saliency engines
//! * [`evaluation`] - Dataset discovery and batch evaluation
//! * [`processors`] - Image encoding and pixel-statistics primitives
//! * [`utils`] - Utility functions for images and visualization
//!
//! ## Quick Start
//!
//! ### Screening and explaining a single image
//!
//! ```rust,no_run
//! use fundus_lens::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), FundusError> {
//! let image = load_image(Path::new("fundus.jpg"))?;
//!
//! // Screen the image before it reaches the classifier
//! let validator = DistributionValidator::default();
//! let verdict = validator.evaluate(&image);
//! if !verdict.is_valid {
//!     for reason in &verdict.reasons {
//!         eprintln!("rejected: {reason}");
//!     }
//!     return Ok(());
//! }
//!
//! // Render a saliency overlay for the winning class
//! let generator = SaliencyMapGenerator::default();
//! let overlay = generator.generate(&image, 0);
//! overlay.save("fundus_saliency.png").ok();
//! # Ok(())
//! # }
//! ```
//!
//! ### Evaluating a classifier over a labeled dataset
//!
//! ```rust,no_run
//! use fundus_lens::prelude::*;
//! use fundus_lens::core::Tensor4D;
//!
//! struct UniformClassifier(usize);
//!
//! impl Classifier for UniformClassifier {
//!     fn class_count(&self) -> usize {
//!         self.0
//!     }
//!
//!     fn classify(&self, _input: &Tensor4D) -> Result<Vec<f32>, FundusError> {
//!         Ok(vec![1.0 / self.0 as f32; self.0])
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vocabulary = ClassVocabulary::fundus_default();
//! let classifier = UniformClassifier(vocabulary.len());
//!
//! let dataset = LabeledDataset::scan("datasets/val", &vocabulary)?;
//! let runner = EvaluationRunner::new(vocabulary.clone())?;
//! let run = runner.run(&dataset, &classifier)?;
//!
//! let metrics = run.metrics(&vocabulary)?;
//! println!("{}", metrics.formatted_report());
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;

pub mod analysis;
pub mod evaluation;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use fundus_lens::prelude::*;
/// ```
///
/// Included items focus on the most common tasks:
/// - Analysis engines (`DistributionValidator`, `SaliencyMapGenerator`,
///   `MetricsEngine`)
/// - Batch evaluation (`EvaluationRunner`, `EvaluationRun`, `LabeledDataset`)
/// - Domain types (`ClassVocabulary`, `Prediction`, `PredictionTuple`)
/// - The classifier boundary and error type (`Classifier`, `FundusError`)
/// - Basic image loading (`load_image`)
///
/// For advanced customization (input encoders, pixel statistics, raw
/// configuration types), import directly from the respective modules
/// (e.g., `fundus_lens::processors`, `fundus_lens::core::config`).
pub mod prelude {
    // Analysis engines (essential)
    pub use crate::analysis::{
        DistributionValidator, MetricsEngine, OODVerdict, SaliencyMapGenerator,
    };

    // Batch evaluation (essential)
    pub use crate::evaluation::{EvaluationRun, EvaluationRunner, LabeledDataset};

    // Domain types (essential)
    pub use crate::domain::{ClassVocabulary, Prediction, PredictionTuple};

    // Classifier boundary and error handling (essential)
    pub use crate::core::{Classifier, FundusError};

    // Image utility (minimal)
    pub use crate::utils::{init_tracing, load_image};
}
