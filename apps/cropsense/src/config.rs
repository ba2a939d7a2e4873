//! Server configuration.
//!
//! Built from CLI flags in `main.rs`; defaults reproduce the stock layout of
//! two bundle files next to the working directory and a local bind on 5000.

use cropsense_core::{Crop, LoadOutcome, ModelStore};
use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default maize bundle file name.
pub const DEFAULT_MAIZE_MODEL: &str = "maize_disease_model.json";

/// Default wheat bundle file name.
pub const DEFAULT_WHEAT_MODEL: &str = "wheat_disease_model.json";

/// Server configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maize bundle file
    pub maize_model: PathBuf,
    /// Wheat bundle file
    pub wheat_model: PathBuf,
    /// HTML file served at `/` instead of the built-in page
    pub index_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            maize_model: PathBuf::from(DEFAULT_MAIZE_MODEL),
            wheat_model: PathBuf::from(DEFAULT_WHEAT_MODEL),
            index_file: None,
        }
    }
}

impl ServerConfig {
    /// Bundle path configured for `crop`.
    #[must_use]
    pub fn model_path(&self, crop: Crop) -> &Path {
        match crop {
            Crop::Maize => &self.maize_model,
            Crop::Wheat => &self.wheat_model,
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Load every configured bundle into a fresh store.
    ///
    /// Failed crops stay absent; each outcome is logged.
    pub fn load_store(&self) -> ModelStore {
        let mut store = ModelStore::new();
        for crop in Crop::ALL {
            let path = self.model_path(crop);
            match store.load(crop, path) {
                LoadOutcome::Loaded {
                    format,
                    stages,
                    labels,
                } => info!(
                    "{} model loaded from {:?} ({} format, {} stages, {} labels)",
                    crop.display_name(),
                    path,
                    format,
                    stages,
                    labels
                ),
                LoadOutcome::Failed { message } => {
                    warn!("{} model load failed: {}", crop.display_name(), message);
                }
            }
        }
        store
    }
}
