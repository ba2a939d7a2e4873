//! # CropSense Core
//!
//! Crop disease model bundles and the read-only Model Store.
//!
//! A bundle maps a raw crop growth stage to a set of disease labels in three
//! steps:
//!
//! ```text
//! stage (i64) ──► StageEncoder ──► code (usize) ──► Classifier ──► indicator
//!                                                                     │
//!                     Vec<String> ◄── LabelDecoder ◄──────────────────┘
//! ```
//!
//! This crate performs no I/O beyond reading bundle files in
//! [`ModelStore::load`], and no logging. Failures are returned as typed
//! errors for the app layer to report.

pub mod bundle;
pub mod classifier;
pub mod crop;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod formats;
pub mod store;

pub use bundle::ModelBundle;
pub use classifier::{Classifier, ClassifierModel, DecisionTree, Forest, LookupTable};
pub use crop::Crop;
pub use decoder::LabelDecoder;
pub use encoder::StageEncoder;
pub use error::{BundleError, FormatError, LoadFailure, StoreError};
pub use formats::{BundleDocument, BundleFormat};
pub use store::{LoadOutcome, ModelStore};

/// A raw crop growth stage as supplied by clients.
pub type Stage = i64;
