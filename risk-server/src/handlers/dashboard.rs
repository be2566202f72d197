//! Dashboard handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use malaria_risk_core::dashboard::{
    state_risk, FeatureImportance, FormSchema, MonthlyRisk, RiskShare, StateRisk, ZoneRisk,
    RISK_DISTRIBUTION, RISK_TRENDS, TOP_FEATURES, ZONES,
};
use malaria_risk_core::features::RawInput;
use malaria_risk_core::scoring::{round_score, RiskTier};
use malaria_risk_core::session::{to_csv_string, SessionEntry};

use crate::handlers::models::ReloadResponse;
use crate::middleware::session::SessionContext;
use crate::middleware::AppJson;
use crate::{AppError, AppResult, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPrediction {
    pub seq: usize,
    pub risk_score: f64,
    pub tier: RiskTier,
    pub recommendation: String,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&SessionEntry> for DashboardPrediction {
    fn from(entry: &SessionEntry) -> Self {
        Self {
            seq: entry.seq,
            risk_score: round_score(entry.risk_score),
            tier: entry.tier,
            recommendation: entry.recommendation.clone(),
            model: entry.model.clone(),
            timestamp: entry.timestamp,
        }
    }
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub id: Uuid,
    pub count: usize,
    pub entries: Vec<SessionEntry>,
}

#[derive(Serialize)]
pub struct FeatureImportanceResponse {
    pub model: String,
    pub features: Vec<FeatureImportance>,
}

#[derive(Serialize)]
pub struct RegionalRiskResponse {
    pub zones: &'static [ZoneRisk],
    pub states: Vec<StateRisk>,
    pub trends: &'static [MonthlyRisk],
    pub distribution: &'static [RiskShare],
}

/// Widget definitions for rendering the form
pub async fn form(State(state): State<AppState>) -> Json<FormSchema> {
    Json(state.dashboard.schema().clone())
}

pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let (id, handle) = state.sessions.create();
    let created_at = handle.lock().created_at;
    tracing::info!("Dashboard session {} started", id);

    (StatusCode::CREATED, Json(SessionCreated { id, created_at }))
}

/// Score a form submission and append it to the session history
pub async fn predict(
    State(state): State<AppState>,
    ctx: SessionContext,
    AppJson(raw): AppJson<RawInput>,
) -> AppResult<Json<DashboardPrediction>> {
    let model = state.dashboard_models.get(None)?;

    let entry = {
        let mut session = ctx.session.lock();
        state.dashboard.predict(&mut session, &raw, &model)?
    };

    Ok(Json(DashboardPrediction::from(&entry)))
}

/// Re-read the dashboard model artifact from disk
pub async fn reload_model(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let model = state.dashboard_models.reload(&state.config.dashboard_model)?;
    tracing::info!("Dashboard model '{}' reloaded via API", model.name);

    Ok(Json(ReloadResponse::from(model.as_ref())))
}

pub async fn history(ctx: SessionContext) -> Json<HistoryResponse> {
    let session = ctx.session.lock();
    Json(HistoryResponse {
        id: ctx.id,
        count: session.log.len(),
        entries: session.log.entries().to_vec(),
    })
}

/// Session history as a CSV download
pub async fn export_csv(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> AppResult<impl IntoResponse> {
    let fields = state.dashboard.export_fields();
    let csv = {
        let session = ctx.session.lock();
        to_csv_string(&session.log, &fields).map_err(|e| AppError::InternalError(e.to_string()))?
    };

    let disposition = format!("attachment; filename=\"malaria_predictions_{}.csv\"", ctx.id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

pub async fn end_session(State(state): State<AppState>, ctx: SessionContext) -> StatusCode {
    state.sessions.remove(&ctx.id);
    tracing::info!("Dashboard session {} ended", ctx.id);
    StatusCode::NO_CONTENT
}

/// Top features of the dashboard model
pub async fn feature_importance(
    State(state): State<AppState>,
) -> AppResult<Json<FeatureImportanceResponse>> {
    let model = state.dashboard_models.get(None)?;
    let features = state.dashboard.feature_importance(model.model.as_ref(), TOP_FEATURES);

    Ok(Json(FeatureImportanceResponse {
        model: model.name.clone(),
        features,
    }))
}

/// Static sample data for the overview charts
pub async fn regional_risk() -> Json<RegionalRiskResponse> {
    Json(RegionalRiskResponse {
        zones: ZONES,
        states: state_risk(),
        trends: RISK_TRENDS,
        distribution: RISK_DISTRIBUTION,
    })
}
