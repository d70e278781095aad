//! Labeled dataset discovery for batch evaluation.
//!
//! Evaluation datasets are directory trees with one subdirectory per class,
//! named exactly after the vocabulary label, each holding the images of that
//! class. [`LabeledDataset::scan`] walks such a tree and produces a
//! deterministic sample order without touching the image contents.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::errors::FundusError;
use crate::domain::vocabulary::ClassVocabulary;
use crate::utils::is_supported_image;

/// A single image with its ground-truth class label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledImage {
    /// Path to the image file.
    pub path: PathBuf,
    /// Ground-truth class label.
    pub expected_label: String,
}

/// An ordered, non-empty collection of labeled images found on disk.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    images: Vec<LabeledImage>,
}

impl LabeledDataset {
    /// Scans `root/<class label>/` directories for supported images.
    ///
    /// Class directories are visited in vocabulary order and the files
    /// within each directory in lexicographic order, so repeated scans of
    /// an unchanged tree yield the same sample order. A vocabulary class
    /// without a directory is skipped with a warning. Files are matched by
    /// extension only; unreadable or corrupt images surface later when the
    /// evaluation run tries to load them.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory holding one subdirectory per class.
    /// * `vocabulary` - Class labels naming the subdirectories.
    ///
    /// # Returns
    ///
    /// * `Ok(LabeledDataset)` - If at least one supported image was found.
    /// * `Err(FundusError)` - If a class directory cannot be read, or no
    ///   supported images exist under `root`.
    pub fn scan(
        root: impl AsRef<Path>,
        vocabulary: &ClassVocabulary,
    ) -> Result<Self, FundusError> {
        let root = root.as_ref();
        let mut images = Vec::new();

        for (_, label) in vocabulary.iter() {
            let class_dir = root.join(label);
            if !class_dir.is_dir() {
                warn!(
                    "class directory {} not found, skipping",
                    class_dir.display()
                );
                continue;
            }

            let mut class_files: Vec<PathBuf> = std::fs::read_dir(&class_dir)?
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .filter(|path| path.is_file() && is_supported_image(path))
                .collect();
            class_files.sort();

            debug!(
                "found {} images under {}",
                class_files.len(),
                class_dir.display()
            );

            for path in class_files {
                images.push(LabeledImage {
                    path,
                    expected_label: label.to_string(),
                });
            }
        }

        if images.is_empty() {
            return Err(FundusError::invalid_input(format!(
                "no supported images found under {}",
                root.display()
            )));
        }

        Ok(Self { images })
    }

    /// Creates a dataset from already discovered samples.
    ///
    /// # Arguments
    ///
    /// * `images` - The samples, in the order they should be evaluated.
    ///
    /// # Returns
    ///
    /// * `Ok(LabeledDataset)` - If the list is non-empty.
    /// * `Err(FundusError)` - If the list is empty.
    pub fn from_images(images: Vec<LabeledImage>) -> Result<Self, FundusError> {
        if images.is_empty() {
            return Err(FundusError::invalid_input("dataset cannot be empty"));
        }
        Ok(Self { images })
    }

    /// Gets the number of samples.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Checks whether the dataset has no samples. Construction rejects empty
    /// datasets, so this is false for any dataset built through the public
    /// constructors.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Gets the samples in evaluation order.
    pub fn images(&self) -> &[LabeledImage] {
        &self.images
    }

    /// Iterates over the samples in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, LabeledImage> {
        self.images.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    fn vocabulary(labels: &[&str]) -> ClassVocabulary {
        ClassVocabulary::new(labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_scan_orders_by_vocabulary_then_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = vocabulary(&["Glaucoma", "Healthy"]);

        fs::create_dir(dir.path().join("Healthy")).unwrap();
        fs::create_dir(dir.path().join("Glaucoma")).unwrap();
        touch(&dir.path().join("Healthy/b.png"));
        touch(&dir.path().join("Healthy/a.png"));
        touch(&dir.path().join("Glaucoma/z.jpg"));

        let dataset = LabeledDataset::scan(dir.path(), &vocab).unwrap();
        assert_eq!(dataset.len(), 3);

        // Glaucoma comes first in the vocabulary; Healthy files sort by name.
        assert_eq!(dataset.images()[0].expected_label, "Glaucoma");
        assert_eq!(dataset.images()[1].expected_label, "Healthy");
        assert!(dataset.images()[1].path.ends_with("a.png"));
        assert!(dataset.images()[2].path.ends_with("b.png"));
    }

    #[test]
    fn test_scan_filters_by_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = vocabulary(&["Healthy"]);

        fs::create_dir(dir.path().join("Healthy")).unwrap();
        touch(&dir.path().join("Healthy/kept.PNG"));
        touch(&dir.path().join("Healthy/kept.Jpeg"));
        touch(&dir.path().join("Healthy/skipped.txt"));
        touch(&dir.path().join("Healthy/no_extension"));

        let dataset = LabeledDataset::scan(dir.path(), &vocab).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_scan_skips_missing_class_directories() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = vocabulary(&["Glaucoma", "Healthy"]);

        fs::create_dir(dir.path().join("Healthy")).unwrap();
        touch(&dir.path().join("Healthy/a.png"));

        let dataset = LabeledDataset::scan(dir.path(), &vocab).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.images()[0].expected_label, "Healthy");
    }

    #[test]
    fn test_scan_rejects_tree_without_images() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = vocabulary(&["Healthy"]);

        fs::create_dir(dir.path().join("Healthy")).unwrap();
        touch(&dir.path().join("Healthy/notes.txt"));

        assert!(LabeledDataset::scan(dir.path(), &vocab).is_err());
    }

    #[test]
    fn test_from_images_rejects_empty_list() {
        assert!(LabeledDataset::from_images(vec![]).is_err());
    }
}
