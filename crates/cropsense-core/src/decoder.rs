//! # Label Decoder
//!
//! Turns a classifier indicator vector back into disease names.

use crate::error::BundleError;
use serde::{Deserialize, Serialize};

/// Ordered disease labels, one per classifier output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDecoder {
    classes: Vec<String>,
}

impl LabelDecoder {
    /// Create a decoder over the given labels, keeping their order.
    #[must_use]
    pub fn new(classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Labels in output order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of labels (expected classifier output width).
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True when the decoder has no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Labels whose indicator entry is non-zero, in class order.
    pub fn inverse_transform(&self, indicator: &[u8]) -> Result<Vec<String>, BundleError> {
        if indicator.len() != self.classes.len() {
            return Err(BundleError::IndicatorWidth {
                expected: self.classes.len(),
                actual: indicator.len(),
            });
        }

        Ok(self
            .classes
            .iter()
            .zip(indicator)
            .filter(|(_, bit)| **bit != 0)
            .map(|(label, _)| label.clone())
            .collect())
    }
}
