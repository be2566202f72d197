//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use malaria_risk_core::features::LayoutInfo;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    default_model: String,
    layout: LayoutInfo,
    active_sessions: usize,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        default_model: state.models.registry().default_model().to_string(),
        layout: state.scoring.columns.info(),
        active_sessions: state.sessions.len(),
    })
}
