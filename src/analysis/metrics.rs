//! Aggregate evaluation metrics over classified samples.
//!
//! [`MetricsEngine`] tallies ground-truth/predicted label pairs into a
//! confusion matrix once at construction and answers accuracy, per-class
//! precision, recall, and F1 queries from the tallied counts. It also renders
//! the fixed-width text report used to summarize an evaluation run.

use serde::{Deserialize, Serialize};

use crate::core::errors::FundusError;
use crate::domain::prediction::PredictionTuple;
use crate::domain::vocabulary::ClassVocabulary;

/// Row-major confusion counts over a class vocabulary.
///
/// Rows are ground-truth classes and columns are predicted classes, both in
/// vocabulary order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: Vec<u32>,
    class_count: usize,
}

impl ConfusionMatrix {
    fn new(class_count: usize) -> Self {
        Self {
            counts: vec![0; class_count * class_count],
            class_count,
        }
    }

    fn tally(&mut self, actual: usize, predicted: usize) {
        self.counts[actual * self.class_count + predicted] += 1;
    }

    /// Cell lookup for positions already known to be in range.
    fn cell(&self, actual: usize, predicted: usize) -> u32 {
        self.counts[actual * self.class_count + predicted]
    }

    /// Gets the number of classes along each axis.
    pub fn class_count(&self) -> usize {
        self.class_count
    }

    /// Gets the count of samples with the given ground-truth and predicted
    /// class positions, or `None` when either position is outside the
    /// vocabulary range.
    pub fn count(&self, actual: usize, predicted: usize) -> Option<u32> {
        if actual >= self.class_count || predicted >= self.class_count {
            return None;
        }
        Some(self.cell(actual, predicted))
    }

    /// Gets the total number of tallied samples.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    fn diagonal(&self, class: usize) -> u32 {
        self.cell(class, class)
    }

    /// Samples whose ground truth is `class`, regardless of prediction.
    fn row_sum(&self, class: usize) -> u32 {
        (0..self.class_count).map(|j| self.cell(class, j)).sum()
    }

    /// Samples predicted as `class`, regardless of ground truth.
    fn column_sum(&self, class: usize) -> u32 {
        (0..self.class_count).map(|i| self.cell(i, class)).sum()
    }
}

/// Computes evaluation metrics from completed prediction tuples.
///
/// Construction tallies every tuple exactly once; all queries afterward are
/// pure reads, so a shared reference can serve concurrent readers.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    vocabulary: ClassVocabulary,
    matrix: ConfusionMatrix,
}

impl MetricsEngine {
    /// Creates an engine by tallying the given tuples.
    ///
    /// # Arguments
    ///
    /// * `tuples` - Ground-truth/predicted label pairs.
    /// * `vocabulary` - Vocabulary both labels of every tuple must belong to.
    ///
    /// # Returns
    ///
    /// * `Ok(MetricsEngine)` - If every label is part of the vocabulary.
    /// * `Err(FundusError)` - If any tuple carries an unknown label. No
    ///   partial tally is observable in that case.
    pub fn new(
        tuples: &[PredictionTuple],
        vocabulary: &ClassVocabulary,
    ) -> Result<Self, FundusError> {
        let mut matrix = ConfusionMatrix::new(vocabulary.len());

        for (position, tuple) in tuples.iter().enumerate() {
            let actual = vocabulary.index_of(&tuple.actual).ok_or_else(|| {
                FundusError::vocabulary_mismatch(
                    &tuple.actual,
                    format!("actual label of sample {position}"),
                )
            })?;
            let predicted = vocabulary.index_of(&tuple.predicted).ok_or_else(|| {
                FundusError::vocabulary_mismatch(
                    &tuple.predicted,
                    format!("predicted label of sample {position}"),
                )
            })?;
            matrix.tally(actual, predicted);
        }

        Ok(Self {
            vocabulary: vocabulary.clone(),
            matrix,
        })
    }

    /// Gets the vocabulary the engine was built over.
    pub fn vocabulary(&self) -> &ClassVocabulary {
        &self.vocabulary
    }

    /// Gets the underlying confusion matrix.
    pub fn matrix(&self) -> &ConfusionMatrix {
        &self.matrix
    }

    /// Gets the total number of tallied samples.
    pub fn total_samples(&self) -> u32 {
        self.matrix.total()
    }

    /// Gets the fraction of samples whose prediction matched the ground
    /// truth. Returns `0.0` when no samples were tallied.
    pub fn overall_accuracy(&self) -> f32 {
        let total = self.matrix.total();
        if total == 0 {
            return 0.0;
        }
        let correct: u32 = (0..self.matrix.class_count())
            .map(|i| self.matrix.diagonal(i))
            .sum();
        correct as f32 / total as f32
    }

    /// Gets the precision for a class: of the samples predicted as `label`,
    /// the fraction whose ground truth was `label`. Returns `0.0` when the
    /// class was never predicted.
    ///
    /// # Arguments
    ///
    /// * `label` - Class label to query.
    ///
    /// # Returns
    ///
    /// * `Ok(f32)` - The precision in `[0, 1]`.
    /// * `Err(FundusError)` - If the label is not in the vocabulary.
    pub fn precision(&self, label: &str) -> Result<f32, FundusError> {
        let class = self.class_index(label)?;
        let true_positives = self.matrix.diagonal(class);
        let predicted = self.matrix.column_sum(class);
        if predicted == 0 {
            return Ok(0.0);
        }
        Ok(true_positives as f32 / predicted as f32)
    }

    /// Gets the recall for a class: of the samples whose ground truth was
    /// `label`, the fraction predicted as `label`. Returns `0.0` when the
    /// class has no ground-truth samples.
    ///
    /// # Arguments
    ///
    /// * `label` - Class label to query.
    ///
    /// # Returns
    ///
    /// * `Ok(f32)` - The recall in `[0, 1]`.
    /// * `Err(FundusError)` - If the label is not in the vocabulary.
    pub fn recall(&self, label: &str) -> Result<f32, FundusError> {
        let class = self.class_index(label)?;
        let true_positives = self.matrix.diagonal(class);
        let actual = self.matrix.row_sum(class);
        if actual == 0 {
            return Ok(0.0);
        }
        Ok(true_positives as f32 / actual as f32)
    }

    /// Gets the F1 score for a class, the harmonic mean of precision and
    /// recall. Returns `0.0` when both are zero.
    ///
    /// # Arguments
    ///
    /// * `label` - Class label to query.
    ///
    /// # Returns
    ///
    /// * `Ok(f32)` - The F1 score in `[0, 1]`.
    /// * `Err(FundusError)` - If the label is not in the vocabulary.
    pub fn f1_score(&self, label: &str) -> Result<f32, FundusError> {
        let precision = self.precision(label)?;
        let recall = self.recall(label)?;
        if precision + recall == 0.0 {
            return Ok(0.0);
        }
        Ok(2.0 * precision * recall / (precision + recall))
    }

    /// Gets the confusion count for a ground-truth/predicted label pair.
    ///
    /// # Arguments
    ///
    /// * `actual` - Ground-truth class label.
    /// * `predicted` - Predicted class label.
    ///
    /// # Returns
    ///
    /// * `Ok(u32)` - The number of samples in that cell.
    /// * `Err(FundusError)` - If either label is not in the vocabulary.
    pub fn confusion_count(&self, actual: &str, predicted: &str) -> Result<u32, FundusError> {
        let actual = self.class_index(actual)?;
        let predicted = self.class_index(predicted)?;
        Ok(self.matrix.cell(actual, predicted))
    }

    /// Renders the fixed-width text report: overall accuracy, per-class
    /// metrics, and the confusion matrix.
    ///
    /// Class names in the matrix are truncated to the column width so the
    /// table stays aligned regardless of label length.
    pub fn formatted_report(&self) -> String {
        let mut report = String::new();

        report.push_str("--- OVERALL EVALUATION ---\n");
        report.push_str(&format!("Total Images: {}\n", self.total_samples()));
        report.push_str(&format!(
            "Accuracy: {:.2}%\n\n",
            self.overall_accuracy() * 100.0
        ));

        report.push_str("--- PER-CLASS METRICS ---\n");
        for (_, label) in self.vocabulary.iter() {
            // Lookups cannot fail for labels drawn from the vocabulary.
            let precision = self.precision(label).unwrap_or(0.0);
            let recall = self.recall(label).unwrap_or(0.0);
            let f1 = self.f1_score(label).unwrap_or(0.0);
            report.push_str(&format!("[{label}]\n"));
            report.push_str(&format!("  Precision: {:.2}%\n", precision * 100.0));
            report.push_str(&format!("  Recall   : {:.2}%\n", recall * 100.0));
            report.push_str(&format!("  F1-Score : {:.2}%\n\n", f1 * 100.0));
        }

        report.push_str("--- CONFUSION MATRIX ---\n");
        report.push_str(&format!("{:<17.17} |", "Actual\\Predicted"));
        for (_, label) in self.vocabulary.iter() {
            report.push_str(&format!(" {label:<10.10} |"));
        }
        report.push('\n');

        for (actual, actual_label) in self.vocabulary.iter() {
            report.push_str(&format!("{actual_label:<17.17} |"));
            for (predicted, _) in self.vocabulary.iter() {
                report.push_str(&format!(" {:<10} |", self.matrix.cell(actual, predicted)));
            }
            report.push('\n');
        }

        report
    }

    fn class_index(&self, label: &str) -> Result<usize, FundusError> {
        self.vocabulary
            .index_of(label)
            .ok_or_else(|| FundusError::vocabulary_mismatch(label, "metric lookup"))
    }
}
