//! Batch evaluation of a classifier over a labeled dataset.
//!
//! [`EvaluationRunner`] drives the per-image pipeline (load, dimension gate,
//! resize, encode, classify) across a [`LabeledDataset`] and collects one
//! [`SampleOutcome`] per sample. A failed sample never aborts the run; its
//! error is kept alongside the successes so callers can report both. Metrics
//! are tallied once from the finished run, not sample by sample.

use std::path::{Path, PathBuf};

use image::RgbImage;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::analysis::metrics::MetricsEngine;
use crate::core::config::{ConfidenceThresholds, ConfigValidator};
use crate::core::constants::{DEFAULT_PARALLEL_THRESHOLD, MIN_INPUT_DIMENSION};
use crate::core::errors::FundusError;
use crate::core::traits::Classifier;
use crate::domain::prediction::{Prediction, PredictionTuple};
use crate::domain::vocabulary::ClassVocabulary;
use crate::evaluation::dataset::{LabeledDataset, LabeledImage};
use crate::processors::{InputEncoder, resize_to_analysis};
use crate::utils::load_image;

/// Result of classifying one dataset sample.
#[derive(Debug)]
pub struct SampleOutcome {
    /// Path of the sample image.
    pub path: PathBuf,
    /// Ground-truth label from the dataset.
    pub expected_label: String,
    /// The prediction, or the error that prevented one.
    pub result: Result<Prediction, FundusError>,
}

/// Everything produced by one evaluation pass over a dataset.
#[derive(Debug)]
pub struct EvaluationRun {
    outcomes: Vec<SampleOutcome>,
}

impl EvaluationRun {
    /// Gets the per-sample outcomes in dataset order.
    pub fn outcomes(&self) -> &[SampleOutcome] {
        &self.outcomes
    }

    /// Gets the number of samples that produced a prediction.
    pub fn success_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    /// Gets the number of samples that failed to produce a prediction.
    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    /// Builds the ground-truth/predicted pairs for the successful samples,
    /// in dataset order. Failed samples contribute nothing.
    pub fn tuples(&self) -> Vec<PredictionTuple> {
        self.outcomes
            .iter()
            .filter_map(|outcome| {
                outcome.result.as_ref().ok().map(|prediction| {
                    PredictionTuple::new(
                        outcome.expected_label.clone(),
                        prediction.predicted_label(),
                    )
                })
            })
            .collect()
    }

    /// Tallies the successful samples into a metrics engine.
    ///
    /// # Arguments
    ///
    /// * `vocabulary` - Vocabulary the run was evaluated against.
    ///
    /// # Returns
    ///
    /// * `Ok(MetricsEngine)` - Metrics over the successful samples.
    /// * `Err(FundusError)` - If a ground-truth label is outside the
    ///   vocabulary.
    pub fn metrics(&self, vocabulary: &ClassVocabulary) -> Result<MetricsEngine, FundusError> {
        MetricsEngine::new(&self.tuples(), vocabulary)
    }
}

/// Runs a classifier over labeled images and single files.
///
/// The runner owns the vocabulary, the input encoder, and the confidence
/// thresholds, so one configured instance can serve any number of runs.
#[derive(Debug)]
pub struct EvaluationRunner {
    vocabulary: ClassVocabulary,
    encoder: InputEncoder,
    thresholds: ConfidenceThresholds,
    parallel_threshold: usize,
}

impl EvaluationRunner {
    /// Creates a runner with the unit-interval encoder and default
    /// confidence thresholds.
    ///
    /// # Arguments
    ///
    /// * `vocabulary` - Class labels in the classifier's output order.
    ///
    /// # Returns
    ///
    /// * `Ok(EvaluationRunner)` - The configured runner.
    /// * `Err(FundusError)` - If the default encoder cannot be constructed.
    pub fn new(vocabulary: ClassVocabulary) -> Result<Self, FundusError> {
        Ok(Self {
            vocabulary,
            encoder: InputEncoder::unit_interval()?,
            thresholds: ConfidenceThresholds::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Replaces the confidence thresholds.
    ///
    /// # Arguments
    ///
    /// * `thresholds` - The cutoffs used when logging prediction bands.
    ///
    /// # Returns
    ///
    /// * `Ok(EvaluationRunner)` - The runner with the thresholds applied.
    /// * `Err(FundusError)` - If the thresholds are out of range.
    pub fn with_confidence_thresholds(
        mut self,
        thresholds: ConfidenceThresholds,
    ) -> Result<Self, FundusError> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(self)
    }

    /// Replaces the input encoder, for classifiers trained with a different
    /// normalization than plain `[0, 1]` scaling.
    ///
    /// # Arguments
    ///
    /// * `encoder` - The encoder applied to every image before classification.
    ///
    /// # Returns
    ///
    /// * `Ok(EvaluationRunner)` - The runner with the encoder applied.
    /// * `Err(FundusError)` - If the encoder configuration is invalid.
    pub fn with_encoder(mut self, encoder: InputEncoder) -> Result<Self, FundusError> {
        encoder.validate_config()?;
        self.encoder = encoder;
        Ok(self)
    }

    /// Sets the sample count above which the run classifies in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Gets the vocabulary the runner evaluates against.
    pub fn vocabulary(&self) -> &ClassVocabulary {
        &self.vocabulary
    }

    /// Classifies a single image file and logs the banded result.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the image file.
    /// * `classifier` - The classifier to invoke.
    ///
    /// # Returns
    ///
    /// * `Ok(Prediction)` - The per-class probabilities and winning class.
    /// * `Err(FundusError)` - If loading, encoding, or classification fails.
    pub fn classify_file<C: Classifier>(
        &self,
        path: impl AsRef<Path>,
        classifier: &C,
    ) -> Result<Prediction, FundusError> {
        let path = path.as_ref();
        let image = load_image(path)?;
        let prediction = self.classify_image(&image, classifier)?;
        info!(
            "{}: {} at {:.1}% ({})",
            path.display(),
            prediction.predicted_label(),
            prediction.confidence() * 100.0,
            prediction.band(&self.thresholds)
        );
        Ok(prediction)
    }

    /// Classifies a decoded image.
    ///
    /// Images below the minimum dimension are rejected before any encoding
    /// happens; everything else is resized to the analysis resolution.
    ///
    /// # Arguments
    ///
    /// * `image` - The decoded image.
    /// * `classifier` - The classifier to invoke.
    ///
    /// # Returns
    ///
    /// * `Ok(Prediction)` - The per-class probabilities and winning class.
    /// * `Err(FundusError)` - If the image is too small, or encoding or
    ///   classification fails.
    pub fn classify_image<C: Classifier>(
        &self,
        image: &RgbImage,
        classifier: &C,
    ) -> Result<Prediction, FundusError> {
        let (width, height) = image.dimensions();
        if width < MIN_INPUT_DIMENSION || height < MIN_INPUT_DIMENSION {
            return Err(FundusError::invalid_input(format!(
                "image {width}x{height} is below the {MIN_INPUT_DIMENSION}px minimum dimension"
            )));
        }

        let resized = resize_to_analysis(image);
        let input = self.encoder.encode(&resized)?;
        let probabilities = classifier.classify(&input)?;
        Prediction::new(&self.vocabulary, probabilities)
    }

    /// Evaluates a classifier over every sample of a dataset.
    ///
    /// Samples are classified in parallel once the dataset exceeds the
    /// parallel threshold. Per-sample failures are collected, not raised;
    /// the returned run keeps one outcome per sample in dataset order.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The labeled samples to classify.
    /// * `classifier` - The classifier to invoke.
    ///
    /// # Returns
    ///
    /// * `Ok(EvaluationRun)` - One outcome per sample.
    /// * `Err(FundusError)` - If the classifier's class count does not match
    ///   the vocabulary.
    pub fn run<C>(
        &self,
        dataset: &LabeledDataset,
        classifier: &C,
    ) -> Result<EvaluationRun, FundusError>
    where
        C: Classifier + Sync,
    {
        if classifier.class_count() != self.vocabulary.len() {
            return Err(FundusError::invalid_input(format!(
                "classifier produces {} classes but the vocabulary has {}",
                classifier.class_count(),
                self.vocabulary.len()
            )));
        }

        info!("evaluating {} samples", dataset.len());

        let classify = |sample: &LabeledImage| -> SampleOutcome {
            let result = load_image(&sample.path)
                .and_then(|image| self.classify_image(&image, classifier));
            if let Err(ref error) = result {
                debug!(
                    "classification failed for {}: {error}",
                    sample.path.display()
                );
            }
            SampleOutcome {
                path: sample.path.clone(),
                expected_label: sample.expected_label.clone(),
                result,
            }
        };

        let outcomes: Vec<SampleOutcome> = if dataset.len() > self.parallel_threshold {
            dataset.images().par_iter().map(classify).collect()
        } else {
            dataset.images().iter().map(classify).collect()
        };

        let run = EvaluationRun { outcomes };
        info!(
            "evaluation finished: {} succeeded, {} failed",
            run.success_count(),
            run.failure_count()
        );
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tensor::Tensor4D;
    use image::Rgb;
    use ndarray::Axis;
    use std::fs;

    /// Classifies by mean red intensity: bright red images are class 0.
    struct BrightnessClassifier;

    impl Classifier for BrightnessClassifier {
        fn class_count(&self) -> usize {
            2
        }

        fn classify(&self, input: &Tensor4D) -> Result<Vec<f32>, FundusError> {
            let red_mean = input.index_axis(Axis(3), 0).mean().unwrap_or(0.0);
            if red_mean > 0.5 {
                Ok(vec![0.9, 0.1])
            } else {
                Ok(vec![0.2, 0.8])
            }
        }
    }

    fn vocabulary(labels: &[&str]) -> ClassVocabulary {
        ClassVocabulary::new(labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn save_image(path: &Path, color: Rgb<u8>, size: u32) {
        RgbImage::from_pixel(size, size, color).save(path).unwrap();
    }

    fn bright_dark_dataset(root: &Path) -> LabeledDataset {
        fs::create_dir(root.join("Bright")).unwrap();
        fs::create_dir(root.join("Dark")).unwrap();
        save_image(&root.join("Bright/one.png"), Rgb([250, 20, 20]), 64);
        save_image(&root.join("Bright/two.png"), Rgb([240, 30, 30]), 64);
        save_image(&root.join("Dark/one.png"), Rgb([10, 10, 10]), 64);

        let vocab = vocabulary(&["Bright", "Dark"]);
        LabeledDataset::scan(root, &vocab).unwrap()
    }

    #[test]
    fn test_run_classifies_every_sample() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = bright_dark_dataset(dir.path());
        let vocab = vocabulary(&["Bright", "Dark"]);
        let runner = EvaluationRunner::new(vocab.clone()).unwrap();

        let run = runner.run(&dataset, &BrightnessClassifier).unwrap();
        assert_eq!(run.outcomes().len(), 3);
        assert_eq!(run.success_count(), 3);
        assert_eq!(run.failure_count(), 0);

        let metrics = run.metrics(&vocab).unwrap();
        assert_eq!(metrics.total_samples(), 3);
        assert!((metrics.overall_accuracy() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_run_keeps_failures_alongside_successes() {
        let dir = tempfile::tempdir().unwrap();
        let dataset_root = dir.path();
        fs::create_dir(dataset_root.join("Bright")).unwrap();
        fs::create_dir(dataset_root.join("Dark")).unwrap();
        save_image(&dataset_root.join("Bright/good.png"), Rgb([250, 20, 20]), 64);
        // Too small to pass the dimension gate.
        save_image(&dataset_root.join("Bright/tiny.png"), Rgb([250, 20, 20]), 10);
        // Not decodable as an image at all.
        fs::write(dataset_root.join("Dark/corrupt.png"), b"not an image").unwrap();

        let vocab = vocabulary(&["Bright", "Dark"]);
        let dataset = LabeledDataset::scan(dataset_root, &vocab).unwrap();
        let runner = EvaluationRunner::new(vocab.clone()).unwrap();

        let run = runner.run(&dataset, &BrightnessClassifier).unwrap();
        assert_eq!(run.outcomes().len(), 3);
        assert_eq!(run.success_count(), 1);
        assert_eq!(run.failure_count(), 2);

        // Only the successful sample reaches the metrics.
        let metrics = run.metrics(&vocab).unwrap();
        assert_eq!(metrics.total_samples(), 1);
    }

    #[test]
    fn test_run_parallel_path_matches_serial() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = bright_dark_dataset(dir.path());
        let vocab = vocabulary(&["Bright", "Dark"]);

        let serial = EvaluationRunner::new(vocab.clone())
            .unwrap()
            .with_parallel_threshold(usize::MAX);
        let parallel = EvaluationRunner::new(vocab.clone())
            .unwrap()
            .with_parallel_threshold(0);

        let serial_run = serial.run(&dataset, &BrightnessClassifier).unwrap();
        let parallel_run = parallel.run(&dataset, &BrightnessClassifier).unwrap();
        assert_eq!(serial_run.tuples(), parallel_run.tuples());
    }

    #[test]
    fn test_run_rejects_class_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = bright_dark_dataset(dir.path());
        let vocab = vocabulary(&["Bright", "Dark", "Gray"]);
        let runner = EvaluationRunner::new(vocab).unwrap();

        assert!(runner.run(&dataset, &BrightnessClassifier).is_err());
    }

    #[test]
    fn test_classify_file_single_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        save_image(&path, Rgb([250, 20, 20]), 64);

        let vocab = vocabulary(&["Bright", "Dark"]);
        let runner = EvaluationRunner::new(vocab).unwrap();
        let prediction = runner.classify_file(&path, &BrightnessClassifier).unwrap();

        assert_eq!(prediction.predicted_label(), "Bright");
        assert!((prediction.confidence() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_classify_image_rejects_undersized_input() {
        let vocab = vocabulary(&["Bright", "Dark"]);
        let runner = EvaluationRunner::new(vocab).unwrap();
        let image = RgbImage::from_pixel(49, 64, Rgb([250, 20, 20]));

        assert!(runner.classify_image(&image, &BrightnessClassifier).is_err());
    }

    #[test]
    fn test_custom_encoder_changes_classifier_input() {
        // An encoder that leaves bytes unscaled pushes every channel mean
        // far above the stub's 0.5 cutoff, so even a dark image reads as
        // class 0.
        let raw_encoder =
            InputEncoder::new(Some(1.0), None, None, None).unwrap();
        let vocab = vocabulary(&["Bright", "Dark"]);
        let runner = EvaluationRunner::new(vocab)
            .unwrap()
            .with_encoder(raw_encoder)
            .unwrap();

        let dark = RgbImage::from_pixel(64, 64, Rgb([10, 10, 10]));
        let prediction = runner.classify_image(&dark, &BrightnessClassifier).unwrap();
        assert_eq!(prediction.predicted_label(), "Bright");
    }

    #[test]
    fn test_with_encoder_rejects_invalid_configuration() {
        // The encoder fields are public, so a caller can hand the runner a
        // broken configuration that no constructor would produce.
        let mut broken = InputEncoder::unit_interval().unwrap();
        broken.alpha = vec![f32::NAN, 1.0, 1.0];

        let vocab = vocabulary(&["Bright", "Dark"]);
        let result = EvaluationRunner::new(vocab).unwrap().with_encoder(broken);
        assert!(result.is_err());
    }
}
