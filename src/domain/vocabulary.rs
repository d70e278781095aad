//! Class vocabulary for fundus image classification.
//!
//! A [`ClassVocabulary`] is the ordered list of class labels a classifier
//! produces probabilities for. The order is significant: probability vectors,
//! confusion matrix rows and columns, and dataset directory scans all follow
//! vocabulary order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::errors::FundusError;

/// Class labels of the fundus disease classifier, in model output order.
pub const FUNDUS_CLASS_NAMES: [&str; 10] = [
    "Central Serous Chorioretinopathy",
    "Diabetic Retinopathy",
    "Disc Edema",
    "Glaucoma",
    "Healthy",
    "Macular Scar",
    "Myopia",
    "Pterygium",
    "Retinal Detachment",
    "Retinitis Pigmentosa",
];

/// An ordered set of class labels with reverse lookup by name.
///
/// The vocabulary fixes the meaning of every position in a probability vector
/// and every row and column of a confusion matrix. Labels are unique and
/// lookups are exact string matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ClassVocabulary {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl ClassVocabulary {
    /// Creates a vocabulary from an ordered list of labels.
    ///
    /// # Arguments
    ///
    /// * `labels` - Class labels in model output order.
    ///
    /// # Returns
    ///
    /// * `Ok(ClassVocabulary)` - If the labels are non-empty and unique.
    /// * `Err(FundusError)` - If the list is empty or contains a duplicate.
    pub fn new(labels: Vec<String>) -> Result<Self, FundusError> {
        if labels.is_empty() {
            return Err(FundusError::invalid_input(
                "class vocabulary cannot be empty",
            ));
        }

        let mut index = HashMap::with_capacity(labels.len());
        for (position, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), position).is_some() {
                return Err(FundusError::invalid_input(format!(
                    "duplicate class label '{label}' in vocabulary"
                )));
            }
        }

        Ok(Self { labels, index })
    }

    /// Creates the default ten-class fundus disease vocabulary.
    pub fn fundus_default() -> Self {
        let labels: Vec<String> = FUNDUS_CLASS_NAMES.iter().map(|s| s.to_string()).collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(position, label)| (label.clone(), position))
            .collect();
        Self { labels, index }
    }

    /// Gets the number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Checks whether the vocabulary has no classes.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Gets the labels in vocabulary order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Looks up the position of a label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Gets the label at a position.
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Checks whether a label is part of the vocabulary.
    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Iterates over `(index, label)` pairs in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(position, label)| (position, label.as_str()))
    }
}

impl TryFrom<Vec<String>> for ClassVocabulary {
    type Error = FundusError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<ClassVocabulary> for Vec<String> {
    fn from(vocabulary: ClassVocabulary) -> Self {
        vocabulary.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_labels() {
        let result = ClassVocabulary::new(vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_duplicate_labels() {
        let labels = vec![
            "Healthy".to_string(),
            "Glaucoma".to_string(),
            "Healthy".to_string(),
        ];
        let result = ClassVocabulary::new(labels);
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Healthy"));
    }

    #[test]
    fn test_fundus_default_has_ten_classes() {
        let vocabulary = ClassVocabulary::fundus_default();
        assert_eq!(vocabulary.len(), 10);
        assert!(!vocabulary.is_empty());
        assert_eq!(vocabulary.label_at(4), Some("Healthy"));
        assert_eq!(vocabulary.index_of("Retinitis Pigmentosa"), Some(9));
        assert!(vocabulary.contains("Diabetic Retinopathy"));
        assert!(!vocabulary.contains("Cataract"));
    }

    #[test]
    fn test_iter_preserves_order() {
        let vocabulary = ClassVocabulary::fundus_default();
        let collected: Vec<(usize, &str)> = vocabulary.iter().collect();
        assert_eq!(collected.len(), 10);
        assert_eq!(collected[0], (0, "Central Serous Chorioretinopathy"));
        assert_eq!(collected[9], (9, "Retinitis Pigmentosa"));
    }

    #[test]
    fn test_serde_round_trip() {
        let vocabulary = ClassVocabulary::fundus_default();
        let json = serde_json::to_string(&vocabulary).unwrap();
        let restored: ClassVocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, vocabulary);
    }

    #[test]
    fn test_serde_rejects_duplicates() {
        let json = r#"["Healthy", "Healthy"]"#;
        let result: Result<ClassVocabulary, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
