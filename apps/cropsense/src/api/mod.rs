//! # HTTP API
//!
//! axum router over a shared, read-only [`ModelStore`].
//!
//! | Method | Path           | Handler                  |
//! |--------|----------------|--------------------------|
//! | GET    | `/`            | [`handlers::home`]        |
//! | GET    | `/crop_stages` | [`handlers::crop_stages`] |
//! | POST   | `/predict`     | [`handlers::predict`]     |
//! | GET    | `/health`      | [`handlers::health`]      |

pub mod error;
pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use cropsense_core::ModelStore;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Built-in landing page.
pub const DEFAULT_INDEX_HTML: &str = include_str!("../../static/index.html");

/// Shared application state
pub struct AppState {
    /// Bundles loaded at startup
    pub store: Arc<ModelStore>,
    /// HTML served at `/`
    pub index_html: Arc<str>,
}

impl AppState {
    pub fn new(store: impl Into<Arc<ModelStore>>) -> Self {
        Self {
            store: store.into(),
            index_html: Arc::from(DEFAULT_INDEX_HTML),
        }
    }

    /// Replace the landing page.
    #[must_use]
    pub fn with_index_html(mut self, html: impl Into<Arc<str>>) -> Self {
        self.index_html = html.into();
        self
    }
}

pub type SharedState = Arc<AppState>;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/crop_stages", get(handlers::crop_stages))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
