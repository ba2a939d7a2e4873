//! # Crop Module
//!
//! The closed set of crops the service holds models for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported crop.
///
/// Ordered so that [`Crop::ALL`] and `BTreeMap<Crop, _>` iterate maize first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Maize,
    Wheat,
}

impl Crop {
    /// Every supported crop, in display order.
    pub const ALL: [Crop; 2] = [Crop::Maize, Crop::Wheat];

    /// Canonical lowercase name, as used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Maize => "maize",
            Crop::Wheat => "wheat",
        }
    }

    /// Capitalized name for human-facing messages.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Crop::Maize => "Maize",
            Crop::Wheat => "Wheat",
        }
    }

    /// Exact match against the canonical lowercase name.
    ///
    /// `"Maize"` does not match; use [`Crop::parse_lenient`] for that.
    #[must_use]
    pub fn parse_exact(name: &str) -> Option<Crop> {
        Crop::ALL.into_iter().find(|crop| crop.as_str() == name)
    }

    /// Case-insensitive match against the canonical name.
    #[must_use]
    pub fn parse_lenient(name: &str) -> Option<Crop> {
        Crop::ALL
            .into_iter()
            .find(|crop| crop.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
