//! # Error Module
//!
//! Error types for bundle decoding, bundle validation and the Model Store.

use crate::{Crop, Stage};
use thiserror::Error;

/// Errors raised while reading or writing a bundle file.
#[derive(Debug, Error)]
pub enum FormatError {
    /// I/O error while reading or writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON document could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary payload could not be decoded or encoded.
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),

    /// Binary file does not start with the bundle magic.
    #[error("not a crop bundle file")]
    BadMagic,

    /// Binary file was written by a newer format version.
    #[error("unsupported bundle version {found} (supported: {supported})")]
    UnsupportedVersion { found: u8, supported: u8 },

    /// File ended before the declared payload.
    #[error("bundle truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Errors raised when a decoded bundle is internally inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BundleError {
    /// The stage encoder knows no stages.
    #[error("stage encoder has no classes")]
    EmptyEncoder,

    /// Classifier output width differs from the label decoder.
    #[error("classifier emits {classifier} outputs but decoder has {decoder} labels")]
    OutputWidthMismatch { classifier: usize, decoder: usize },

    /// A lookup table row count differs from the encoder class count.
    #[error("lookup table has {rows} rows but encoder has {classes} stages")]
    TableRowMismatch { rows: usize, classes: usize },

    /// Rows of a lookup table have different widths.
    #[error("lookup table row {row} has width {width}, expected {expected}")]
    RaggedTable {
        row: usize,
        width: usize,
        expected: usize,
    },

    /// A decision tree is malformed.
    #[error("invalid tree: {0}")]
    InvalidTree(String),

    /// An indicator vector did not match the decoder width.
    #[error("indicator has {actual} entries, expected {expected}")]
    IndicatorWidth { expected: usize, actual: usize },

    /// Classifier was asked about a code outside its domain.
    #[error("encoded stage {0} is out of range")]
    CodeOutOfRange(usize),
}

/// Errors surfaced by the Model Store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Bundle file could not be decoded.
    #[error("failed to load {crop} model from {path}: {source}")]
    ModelLoadFailure {
        crop: Crop,
        path: String,
        #[source]
        source: LoadFailure,
    },

    /// No bundle is present for the crop.
    #[error("{} model not loaded", .0.display_name())]
    ModelNotLoaded(Crop),

    /// Stage is unknown to the crop's encoder.
    #[error("unknown crop stage {0}")]
    InvalidStage(Stage),

    /// Bundle failed at prediction time.
    #[error("prediction failed: {0}")]
    Prediction(#[from] BundleError),
}

/// Underlying cause of a [`StoreError::ModelLoadFailure`].
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Bundle(#[from] BundleError),
}
