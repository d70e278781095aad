//! Prediction value objects produced by a classifier run.
//!
//! A [`Prediction`] pairs a probability vector with its vocabulary so the
//! winning class, per-class scores, and confidence banding can be read off
//! without carrying the classifier itself around. [`PredictionTuple`] is the
//! ground-truth/predicted pair consumed by the metrics engine.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::ConfidenceThresholds;
use crate::core::errors::FundusError;
use crate::domain::vocabulary::ClassVocabulary;

/// Probability assigned to a single class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    /// Class label from the vocabulary.
    pub label: String,
    /// Probability the classifier assigned to this class.
    pub probability: f32,
    /// Position of the class in the vocabulary.
    pub class_index: usize,
}

/// Qualitative band the winning probability falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    /// The winning probability clears the confident threshold.
    Confident,
    /// The winning probability clears the plausible threshold only.
    Uncertain,
    /// The winning probability falls below the plausible threshold.
    Implausible,
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceBand::Confident => write!(f, "confident"),
            ConfidenceBand::Uncertain => write!(f, "uncertain"),
            ConfidenceBand::Implausible => write!(f, "implausible"),
        }
    }
}

/// A classified image: per-class scores in vocabulary order plus the
/// position of the winning class.
///
/// The winning class is the first strict maximum of the probability vector,
/// so ties resolve to the lower class index. Probabilities are stored as the
/// classifier produced them and never renormalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    scores: Vec<ClassScore>,
    predicted_index: usize,
}

impl Prediction {
    /// Creates a prediction from a raw probability vector.
    ///
    /// # Arguments
    ///
    /// * `vocabulary` - Vocabulary naming each probability position.
    /// * `probabilities` - One probability per vocabulary class.
    ///
    /// # Returns
    ///
    /// * `Ok(Prediction)` - If the vector length matches the vocabulary.
    /// * `Err(FundusError)` - If the lengths differ.
    pub fn new(
        vocabulary: &ClassVocabulary,
        probabilities: Vec<f32>,
    ) -> Result<Self, FundusError> {
        if probabilities.len() != vocabulary.len() {
            return Err(FundusError::invalid_input(format!(
                "expected {} class probabilities, got {}",
                vocabulary.len(),
                probabilities.len()
            )));
        }

        let mut predicted_index = 0;
        let mut best = probabilities[0];
        for (position, &probability) in probabilities.iter().enumerate().skip(1) {
            if probability > best {
                best = probability;
                predicted_index = position;
            }
        }

        let scores = probabilities
            .into_iter()
            .enumerate()
            .map(|(position, probability)| ClassScore {
                label: vocabulary
                    .label_at(position)
                    .unwrap_or_default()
                    .to_string(),
                probability,
                class_index: position,
            })
            .collect();

        Ok(Self {
            scores,
            predicted_index,
        })
    }

    /// Gets the position of the winning class.
    pub fn predicted_index(&self) -> usize {
        self.predicted_index
    }

    /// Gets the label of the winning class.
    pub fn predicted_label(&self) -> &str {
        &self.scores[self.predicted_index].label
    }

    /// Gets the probability of the winning class.
    pub fn confidence(&self) -> f32 {
        self.scores[self.predicted_index].probability
    }

    /// Gets the per-class scores in vocabulary order.
    pub fn class_scores(&self) -> &[ClassScore] {
        &self.scores
    }

    /// Gets the `n` highest-scoring classes, best first.
    ///
    /// Ties keep vocabulary order. Asking for more classes than the
    /// vocabulary holds returns all of them.
    pub fn top_n(&self, n: usize) -> Vec<ClassScore> {
        let mut ranked: Vec<&ClassScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
        });
        ranked.into_iter().take(n).cloned().collect()
    }

    /// Bands the winning probability against the given thresholds.
    pub fn band(&self, thresholds: &ConfidenceThresholds) -> ConfidenceBand {
        let confidence = self.confidence();
        if confidence < thresholds.plausible {
            ConfidenceBand::Implausible
        } else if confidence < thresholds.confident {
            ConfidenceBand::Uncertain
        } else {
            ConfidenceBand::Confident
        }
    }
}

/// A completed evaluation sample pairing the ground-truth label with the
/// predicted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionTuple {
    /// Ground-truth class label, taken from the dataset directory name.
    pub actual: String,
    /// Class label the classifier assigned.
    pub predicted: String,
}

impl PredictionTuple {
    /// Creates a tuple from actual and predicted labels.
    pub fn new(actual: impl Into<String>, predicted: impl Into<String>) -> Self {
        Self {
            actual: actual.into(),
            predicted: predicted.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(labels: &[&str]) -> ClassVocabulary {
        ClassVocabulary::new(labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let vocab = vocabulary(&["a", "b", "c"]);
        assert!(Prediction::new(&vocab, vec![0.5, 0.5]).is_err());
        assert!(Prediction::new(&vocab, vec![]).is_err());
    }

    #[test]
    fn test_argmax_picks_highest_probability() {
        let vocab = vocabulary(&["a", "b", "c"]);
        let prediction = Prediction::new(&vocab, vec![0.1, 0.7, 0.2]).unwrap();
        assert_eq!(prediction.predicted_index(), 1);
        assert_eq!(prediction.predicted_label(), "b");
        assert!((prediction.confidence() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_argmax_tie_keeps_first_class() {
        let vocab = vocabulary(&["a", "b", "c"]);
        let prediction = Prediction::new(&vocab, vec![0.2, 0.4, 0.4]).unwrap();
        assert_eq!(prediction.predicted_index(), 1);
    }

    #[test]
    fn test_top_n_sorts_descending_with_stable_ties() {
        let vocab = vocabulary(&["a", "b", "c", "d"]);
        let prediction = Prediction::new(&vocab, vec![0.1, 0.3, 0.3, 0.2]).unwrap();
        let top = prediction.top_n(3);
        assert_eq!(top.len(), 3);
        // b and c tie at 0.3; the stable sort keeps vocabulary order.
        assert_eq!(top[0].label, "b");
        assert_eq!(top[1].label, "c");
        assert_eq!(top[2].label, "d");
    }

    #[test]
    fn test_top_n_caps_at_class_count() {
        let vocab = vocabulary(&["a", "b"]);
        let prediction = Prediction::new(&vocab, vec![0.6, 0.4]).unwrap();
        assert_eq!(prediction.top_n(10).len(), 2);
    }

    #[test]
    fn test_band_thresholds() {
        let vocab = vocabulary(&["a", "b"]);
        let thresholds = ConfidenceThresholds::default();

        let confident = Prediction::new(&vocab, vec![0.5, 0.5]).unwrap();
        assert_eq!(confident.band(&thresholds), ConfidenceBand::Confident);

        let uncertain = Prediction::new(&vocab, vec![0.35, 0.3]).unwrap();
        assert_eq!(uncertain.band(&thresholds), ConfidenceBand::Uncertain);

        let implausible = Prediction::new(&vocab, vec![0.15, 0.12]).unwrap();
        assert_eq!(implausible.band(&thresholds), ConfidenceBand::Implausible);
    }

    #[test]
    fn test_class_scores_keep_vocabulary_order() {
        let vocab = vocabulary(&["a", "b", "c"]);
        let prediction = Prediction::new(&vocab, vec![0.3, 0.5, 0.2]).unwrap();
        let scores = prediction.class_scores();
        assert_eq!(scores[0].class_index, 0);
        assert_eq!(scores[1].class_index, 1);
        assert_eq!(scores[2].class_index, 2);
        assert_eq!(scores[1].label, "b");
    }

    #[test]
    fn test_prediction_tuple_new() {
        let tuple = PredictionTuple::new("Healthy", "Glaucoma");
        assert_eq!(tuple.actual, "Healthy");
        assert_eq!(tuple.predicted, "Glaucoma");
    }
}
