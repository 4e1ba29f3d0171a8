use std::collections::BTreeSet;

use crate::MlError;

/// Bijection between label strings and the integers `[0, k)`.
///
/// Classes are numbered in sorted lexicographic order, so the mapping only
/// depends on the set of labels, not on the order they were seen in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Builds the encoder from every label in the dataset.
    ///
    /// # Errors
    /// Returns `MlError::InvalidInput` if `labels` is empty.
    pub fn fit<'a, I>(labels: I) -> Result<Self, MlError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: Vec<String> = labels
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        if classes.is_empty() {
            return Err(MlError::InvalidInput("cannot fit a label encoder without labels"));
        }

        Ok(Self { classes })
    }

    /// Number of distinct classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class labels ordered by their encoded index.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Maps a label to its class index.
    ///
    /// # Errors
    /// Returns `MlError::UnseenLabel` if `label` was not present at fit time.
    pub fn transform(&self, label: &str) -> Result<usize, MlError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| MlError::UnseenLabel(label.to_string()))
    }

    /// Maps every label in order.
    ///
    /// # Errors
    /// Fails on the first unseen label.
    pub fn transform_all<'a, I>(&self, labels: I) -> Result<Vec<usize>, MlError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels.into_iter().map(|l| self.transform(l)).collect()
    }

    /// Maps a class index back to its label.
    ///
    /// Takes a signed index because regression outputs are rounded before
    /// being inverted and can land below zero.
    ///
    /// # Errors
    /// Returns `MlError::UnknownLabel` if `index` is outside `[0, k)`.
    pub fn inverse(&self, index: i64) -> Result<&str, MlError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.classes.get(i))
            .map(String::as_str)
            .ok_or(MlError::UnknownLabel {
                index,
                classes: self.classes.len(),
            })
    }
}
