//! Dataset discovery and batch evaluation.
//!
//! This module holds the pieces that turn a labeled directory tree and a
//! classifier into per-sample outcomes and aggregate metrics.

pub mod dataset;
pub mod runner;

pub use dataset::{LabeledDataset, LabeledImage};
pub use runner::{EvaluationRun, EvaluationRunner, SampleOutcome};
