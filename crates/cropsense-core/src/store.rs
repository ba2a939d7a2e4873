//! # Model Store
//!
//! Holds at most one bundle per crop, loaded once at startup.
//!
//! Loading never aborts: a bundle that fails to decode leaves its crop
//! absent and the failure is kept for diagnostics. After startup the store
//! is only read, so it can be shared behind an `Arc` without locking.

use crate::bundle::ModelBundle;
use crate::crop::Crop;
use crate::error::StoreError;
use crate::formats::{BundleFormat, read_bundle};
use crate::Stage;
use std::collections::BTreeMap;
use std::path::Path;

/// Result of a single [`ModelStore::load`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Bundle is now present.
    Loaded {
        format: BundleFormat,
        stages: usize,
        labels: usize,
    },
    /// Crop is absent; the message describes why.
    Failed { message: String },
}

impl LoadOutcome {
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

/// Read-only registry of crop bundles.
#[derive(Debug, Default)]
pub struct ModelStore {
    bundles: BTreeMap<Crop, ModelBundle>,
    failures: BTreeMap<Crop, String>,
}

impl ModelStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the bundle for `crop` from `path`.
    ///
    /// On failure the crop is left absent (replacing any earlier bundle)
    /// and the error message is recorded.
    pub fn load(&mut self, crop: Crop, path: &Path) -> LoadOutcome {
        match read_bundle(path) {
            Ok((format, bundle)) => {
                let outcome = LoadOutcome::Loaded {
                    format,
                    stages: bundle.stage_encoder().len(),
                    labels: bundle.label_decoder().len(),
                };
                self.insert(crop, bundle);
                outcome
            }
            Err(source) => {
                let error = StoreError::ModelLoadFailure {
                    crop,
                    path: path.display().to_string(),
                    source,
                };
                let message = error.to_string();
                self.bundles.remove(&crop);
                self.failures.insert(crop, message.clone());
                LoadOutcome::Failed { message }
            }
        }
    }

    /// Inject an already-built bundle.
    pub fn insert(&mut self, crop: Crop, bundle: ModelBundle) {
        self.failures.remove(&crop);
        self.bundles.insert(crop, bundle);
    }

    /// Builder-style [`ModelStore::insert`].
    #[must_use]
    pub fn with_bundle(mut self, crop: Crop, bundle: ModelBundle) -> Self {
        self.insert(crop, bundle);
        self
    }

    #[must_use]
    pub fn is_loaded(&self, crop: Crop) -> bool {
        self.bundles.contains_key(&crop)
    }

    /// Loaded bundle for `crop`, if any.
    #[must_use]
    pub fn bundle(&self, crop: Crop) -> Option<&ModelBundle> {
        self.bundles.get(&crop)
    }

    /// Message recorded by the last failed load for `crop`.
    #[must_use]
    pub fn load_error(&self, crop: Crop) -> Option<&str> {
        self.failures.get(&crop).map(String::as_str)
    }

    /// Ordered stages known for `crop`; empty when absent.
    #[must_use]
    pub fn get_stages(&self, crop: Crop) -> Vec<Stage> {
        self.bundles
            .get(&crop)
            .map(|bundle| bundle.stages().to_vec())
            .unwrap_or_default()
    }

    /// Predict disease labels for a stage of `crop`.
    pub fn predict(&self, crop: Crop, stage: Stage) -> Result<Vec<String>, StoreError> {
        let bundle = self
            .bundles
            .get(&crop)
            .ok_or(StoreError::ModelNotLoaded(crop))?;
        bundle.predict(stage)
    }
}

// =============================================================================
// TESTS
// =============================================================================
