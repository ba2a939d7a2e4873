//! Route handlers.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Html,
};
use cropsense_core::Crop;
use serde_json::Value;
use tracing::{debug, warn};

use super::SharedState;
use super::error::ApiError;
use super::types::{
    CropStagesResponse, HealthResponse, PredictRequest, PredictResponse, StageValue, coerce_stage,
};

/// GET / - Landing page
pub async fn home(State(state): State<SharedState>) -> Html<String> {
    Html(state.index_html.to_string())
}

/// GET /crop_stages - Known stages for a crop (case-insensitive)
pub async fn crop_stages(
    State(state): State<SharedState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<CropStagesResponse> {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!("Rejected crop_stages query: {}", rejection.body_text());
            Vec::new()
        }
    };

    // Repeated keys resolve to the first occurrence.
    let crop_stages = params
        .iter()
        .find(|(key, _)| key == "crop_type")
        .and_then(|(_, value)| Crop::parse_lenient(value))
        .map(|crop| state.store.get_stages(crop))
        .unwrap_or_default();
    Json(CropStagesResponse { crop_stages })
}

/// POST /predict - Disease labels for a crop stage
pub async fn predict(
    State(state): State<SharedState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected predict body: {}", rejection.body_text());
        ApiError::MalformedBody
    })?;

    let raw_stage = request.crop_stage.ok_or(ApiError::MissingField)?;
    let stage_value = coerce_stage(&raw_stage).ok_or(ApiError::InvalidValue)?;

    let crop = request
        .crop_type
        .as_ref()
        .and_then(Value::as_str)
        .and_then(Crop::parse_exact)
        .ok_or(ApiError::UnknownCrop)?;

    let stage = match stage_value {
        StageValue::Code(stage) => stage,
        StageValue::OutOfRange(digits) => {
            state
                .store
                .bundle(crop)
                .ok_or(ApiError::ModelNotLoaded(crop))?;
            return Err(ApiError::StageOutOfRange(digits));
        }
    };

    let predicted_diseases = state.store.predict(crop, stage)?;
    debug!(
        "Predicted {} disease(s) for {} stage {}",
        predicted_diseases.len(),
        crop,
        stage
    );

    Ok(Json(PredictResponse::success(predicted_diseases)))
}

/// GET /health - Model load status
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let working_directory = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy".to_string(),
        maize_model_loaded: state.store.is_loaded(Crop::Maize),
        wheat_model_loaded: state.store.is_loaded(Crop::Wheat),
        working_directory,
    })
}
