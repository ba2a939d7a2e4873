//! # Bundle Module
//!
//! A classifier together with its stage encoder and label decoder.
//!
//! A [`ModelBundle`] can only be obtained through [`ModelBundle::new`], which
//! checks that the three parts agree with each other. There is no partially
//! loaded bundle.

use crate::classifier::{Classifier, ClassifierModel};
use crate::decoder::LabelDecoder;
use crate::encoder::StageEncoder;
use crate::error::{BundleError, StoreError};
use crate::Stage;

/// A validated, immutable model bundle for one crop.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    classifier: ClassifierModel,
    stage_encoder: StageEncoder,
    label_decoder: LabelDecoder,
}

impl ModelBundle {
    /// Assemble and validate a bundle.
    pub fn new(
        classifier: ClassifierModel,
        stage_encoder: StageEncoder,
        label_decoder: LabelDecoder,
    ) -> Result<Self, BundleError> {
        classifier.validate()?;

        if classifier.n_outputs() != label_decoder.len() {
            return Err(BundleError::OutputWidthMismatch {
                classifier: classifier.n_outputs(),
                decoder: label_decoder.len(),
            });
        }

        if let ClassifierModel::Table(table) = &classifier {
            if table.len() != stage_encoder.len() {
                return Err(BundleError::TableRowMismatch {
                    rows: table.len(),
                    classes: stage_encoder.len(),
                });
            }
        }

        Ok(Self {
            classifier,
            stage_encoder,
            label_decoder,
        })
    }

    #[must_use]
    pub fn classifier(&self) -> &ClassifierModel {
        &self.classifier
    }

    #[must_use]
    pub fn stage_encoder(&self) -> &StageEncoder {
        &self.stage_encoder
    }

    #[must_use]
    pub fn label_decoder(&self) -> &LabelDecoder {
        &self.label_decoder
    }

    /// Known stages in ascending order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        self.stage_encoder.classes()
    }

    /// Encode the stage, run the classifier and decode the labels.
    pub fn predict(&self, stage: Stage) -> Result<Vec<String>, StoreError> {
        let code = self.stage_encoder.transform(stage)?;
        let indicator = self.classifier.predict(code)?;
        Ok(self.label_decoder.inverse_transform(&indicator)?)
    }

    /// Split back into parts.
    #[must_use]
    pub fn into_parts(self) -> (ClassifierModel, StageEncoder, LabelDecoder) {
        (self.classifier, self.stage_encoder, self.label_decoder)
    }
}

// =============================================================================
// TESTS
// =============================================================================
