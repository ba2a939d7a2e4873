//! API error type and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cropsense_core::{Crop, Stage, StoreError};
use thiserror::Error;
use tracing::error;

use super::types::ErrorResponse;

/// Request failures surfaced to clients as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `crop_stage` missing or null.
    #[error("Crop stage required")]
    MissingField,

    /// `crop_stage` not coercible to an integer.
    #[error("Invalid stage value")]
    InvalidValue,

    /// `crop_type` missing or not a supported crop.
    #[error("Invalid crop type")]
    UnknownCrop,

    /// Bundle for the crop is absent.
    #[error("{} model not loaded", .0.display_name())]
    ModelNotLoaded(Crop),

    /// Stage is not known to the crop's encoder.
    #[error("Unknown crop stage {0}")]
    UnknownStage(Stage),

    /// Integer stage too large for any encoder.
    #[error("Unknown crop stage {0}")]
    StageOutOfRange(String),

    /// Request body is not a JSON object.
    #[error("Invalid JSON body")]
    MalformedBody,

    /// Any other failure inside the store.
    #[error("Prediction failed")]
    Internal(#[source] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField
            | Self::InvalidValue
            | Self::UnknownCrop
            | Self::UnknownStage(_)
            | Self::StageOutOfRange(_)
            | Self::MalformedBody => StatusCode::BAD_REQUEST,
            Self::ModelNotLoaded(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ModelNotLoaded(crop) => Self::ModelNotLoaded(crop),
            StoreError::InvalidStage(stage) => Self::UnknownStage(stage),
            other => Self::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(source) = &self {
            error!("Prediction failed: {}", source);
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
