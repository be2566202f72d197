//! Prediction handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use malaria_risk_core::features::{assemble_batch, FeatureVector, RawInput};
use malaria_risk_core::scoring::{self, round_score};

use crate::middleware::AppJson;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub risk_score: f64,
    pub model: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchRequest {
    #[serde(default)]
    pub model: Option<String>,
    /// 1 to 1000 records
    #[validate(length(min = 1, max = 1000))]
    pub records: Vec<RawInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPrediction {
    pub risk_score: f64,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub model: String,
    pub predictions: Vec<BatchPrediction>,
}

/// Score one record. The optional `model` key selects the model and is not
/// a feature.
pub async fn predict(
    State(state): State<AppState>,
    AppJson(mut raw): AppJson<RawInput>,
) -> AppResult<Json<PredictResponse>> {
    let model_name = take_model_name(&mut raw)?;
    let (model, mut scores) = score_records(&state, model_name.as_deref(), &[raw])?;

    let risk_score = scores
        .pop()
        .ok_or_else(|| AppError::InternalError("assembler returned no vector".to_string()))?;

    Ok(Json(PredictResponse { risk_score, model }))
}

/// Score many records with one model; categorical encoding spans the batch
pub async fn predict_batch(
    State(state): State<AppState>,
    AppJson(req): AppJson<BatchRequest>,
) -> AppResult<Json<BatchResponse>> {
    req.validate()?;

    let (model, scores) = score_records(&state, req.model.as_deref(), &req.records)?;
    tracing::debug!("Scored batch of {} with '{}'", scores.len(), model);

    Ok(Json(BatchResponse {
        model,
        predictions: scores
            .into_iter()
            .map(|risk_score| BatchPrediction { risk_score })
            .collect(),
    }))
}

fn take_model_name(raw: &mut RawInput) -> AppResult<Option<String>> {
    match raw.remove("model") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) => Ok(Some(name)),
        Some(other) => Err(AppError::ValidationError(format!(
            "model must be a string, got {}",
            other
        ))),
    }
}

/// Resolve the model, assemble every record and score it; rounded scores
fn score_records(
    state: &AppState,
    model_name: Option<&str>,
    records: &[RawInput],
) -> AppResult<(String, Vec<f64>)> {
    // Unknown names fail here, before any assembly
    let model = state.models.get(model_name)?;

    let config = &state.scoring;
    let vectors: Vec<FeatureVector> =
        assemble_batch(records, &config.columns, Some(&config.field_map), &config.encoding);

    let mut scores = Vec::with_capacity(vectors.len());
    for vector in &vectors {
        vector
            .validate(&config.columns)
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        tracing::debug!("Feature vector: {}", vector.to_log_entry(&config.columns));

        let result =
            scoring::score(vector, model.model.as_ref(), &model.name, state.config.score_output)?;
        scores.push(round_score(result.risk_score));
    }

    Ok((model.name.clone(), scores))
}
