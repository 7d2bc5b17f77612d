//! Categorical one-hot encoding

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::FeatureFrame;

/// Fit-time vocabularies for the designated categorical columns
///
/// Vocabularies are sorted so the indicator layout is deterministic for a
/// given training set. A category unseen at fit time encodes as an all-zero
/// block, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub columns: Vec<String>,
    pub vocabularies: Vec<Vec<String>>,
}

impl OneHotEncoder {
    /// Collect the sorted category vocabulary of each column
    pub fn fit(frame: &FeatureFrame, columns: &[String]) -> Result<Self> {
        let mut vocabularies = Vec::with_capacity(columns.len());

        for column in columns {
            let values = frame.categorical(column)?;
            let mut vocabulary: Vec<String> = values.to_vec();
            vocabulary.sort();
            vocabulary.dedup();
            vocabularies.push(vocabulary);
        }

        Ok(Self {
            columns: columns.to_vec(),
            vocabularies,
        })
    }

    /// Indicator slot of `value` within the column at `index`, if seen at fit
    pub fn category_slot(&self, index: usize, value: &str) -> Option<usize> {
        self.vocabularies[index]
            .binary_search_by(|candidate| candidate.as_str().cmp(value))
            .ok()
    }

    /// Total width of all indicator blocks
    pub fn encoded_width(&self) -> usize {
        self.vocabularies.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::tests::sample_rows;

    #[test]
    fn test_vocabulary_is_sorted_and_deduped() {
        let frame = FeatureFrame::from_rows(&sample_rows());
        let encoder = OneHotEncoder::fit(&frame, &["os".to_string()]).unwrap();

        assert_eq!(encoder.vocabularies[0], vec!["mac", "windows"]);
        assert_eq!(encoder.encoded_width(), 2);
    }

    #[test]
    fn test_category_slot_lookup() {
        let frame = FeatureFrame::from_rows(&sample_rows());
        let encoder = OneHotEncoder::fit(&frame, &["Company".to_string()]).unwrap();

        // Sorted vocabulary: Apple, Dell, HP
        assert_eq!(encoder.category_slot(0, "Apple"), Some(0));
        assert_eq!(encoder.category_slot(0, "HP"), Some(2));
        assert_eq!(encoder.category_slot(0, "Lenovo"), None);
    }

    #[test]
    fn test_numeric_column_fails() {
        let frame = FeatureFrame::from_rows(&sample_rows());
        assert!(OneHotEncoder::fit(&frame, &["Ram".to_string()]).is_err());
    }
}
