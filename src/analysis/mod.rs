//! Analysis engines that run around a classifier.
//!
//! This module groups the three post-hoc analyses: input-distribution
//! screening before classification, saliency overlays explaining a single
//! prediction, and aggregate metrics over an evaluation run.

pub mod distribution;
pub mod metrics;
pub mod saliency;

pub use distribution::{DistributionValidator, OODVerdict};
pub use metrics::{ConfusionMatrix, MetricsEngine};
pub use saliency::SaliencyMapGenerator;
