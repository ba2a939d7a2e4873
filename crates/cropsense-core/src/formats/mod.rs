//! # Formats Module
//!
//! On-disk encodings of a model bundle.
//!
//! This module contains:
//! - The serde document shared by every encoding
//! - JSON encoding (human-editable, as emitted by the training process)
//! - Binary encoding (postcard payload behind a magic/version header)
//!
//! Reading a file is the only I/O here; everything else is pure conversion.

mod persistence;

pub use persistence::*;
