//! Model cache handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use malaria_risk_core::model::{LoadedModel, ModelStatus};

use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct ModelListResponse {
    pub default_model: String,
    pub models: Vec<ModelStatus>,
    pub dashboard: Vec<ModelStatus>,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub name: String,
    pub kind: &'static str,
    pub sha256: String,
}

impl From<&LoadedModel> for ReloadResponse {
    fn from(model: &LoadedModel) -> Self {
        Self {
            name: model.name.clone(),
            kind: model.model.kind(),
            sha256: model.sha256.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct ClearCacheResponse {
    pub cleared: usize,
}

/// Configured models and their cache state
pub async fn list(State(state): State<AppState>) -> Json<ModelListResponse> {
    Json(ModelListResponse {
        default_model: state.models.registry().default_model().to_string(),
        models: state.models.status(),
        dashboard: state.dashboard_models.status(),
    })
}

/// Re-read one prediction model artifact from disk. The dashboard model has
/// its own route since it may share a name with a prediction model.
pub async fn reload(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ReloadResponse>> {
    let model = state.models.reload(&name)?;

    tracing::info!("Model '{}' reloaded via API", model.name);

    Ok(Json(ReloadResponse::from(model.as_ref())))
}

/// Drop every cached model; the next request reloads from disk
pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let cleared = state.models.invalidate_all() + state.dashboard_models.invalidate_all();
    Json(ClearCacheResponse { cleared })
}
