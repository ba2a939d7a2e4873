//! # Stage Encoder
//!
//! Bidirectional mapping between raw stage codes and dense integer codes.
//!
//! Classes are kept sorted and unique, so the dense code of a stage is its
//! index in [`StageEncoder::classes`].

use crate::Stage;
use crate::error::{BundleError, StoreError};
use serde::{Deserialize, Serialize};

/// Maps raw stages to dense codes `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncoderRepr", into = "EncoderRepr")]
pub struct StageEncoder {
    classes: Vec<Stage>,
}

/// Serialized shape: `{"classes": [..]}` in any order.
#[derive(Serialize, Deserialize)]
struct EncoderRepr {
    classes: Vec<Stage>,
}

impl StageEncoder {
    /// Build an encoder from any collection of stages.
    ///
    /// Duplicates are dropped and the classes are sorted.
    pub fn new(stages: impl IntoIterator<Item = Stage>) -> Result<Self, BundleError> {
        let mut classes: Vec<Stage> = stages.into_iter().collect();
        classes.sort_unstable();
        classes.dedup();
        if classes.is_empty() {
            return Err(BundleError::EmptyEncoder);
        }
        Ok(Self { classes })
    }

    /// Known stages in ascending order.
    #[must_use]
    pub fn classes(&self) -> &[Stage] {
        &self.classes
    }

    /// Number of known stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always false for a constructed encoder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Dense code of a stage.
    pub fn transform(&self, stage: Stage) -> Result<usize, StoreError> {
        self.classes
            .binary_search(&stage)
            .map_err(|_| StoreError::InvalidStage(stage))
    }

    /// Raw stage of a dense code.
    #[must_use]
    pub fn inverse_transform(&self, code: usize) -> Option<Stage> {
        self.classes.get(code).copied()
    }
}

impl TryFrom<EncoderRepr> for StageEncoder {
    type Error = BundleError;

    fn try_from(repr: EncoderRepr) -> Result<Self, Self::Error> {
        Self::new(repr.classes)
    }
}

impl From<StageEncoder> for EncoderRepr {
    fn from(encoder: StageEncoder) -> Self {
        Self {
            classes: encoder.classes,
        }
    }
}
