//! Scoring - model output → user-facing result

pub mod threshold;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ScoringError, ScoringResult};
use crate::features::FeatureVector;
use crate::model::RiskModel;

pub use threshold::{RiskTier, HIGH_RISK_THRESHOLD, LOW_RISK_THRESHOLD};

/// Which model output becomes the risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOutput {
    /// Positive-class probability
    #[default]
    Probability,
    /// Point estimate (class label)
    Label,
}

impl FromStr for ScoreOutput {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "probability" | "proba" => Ok(ScoreOutput::Probability),
            "label" | "predict" => Ok(ScoreOutput::Label),
            other => Err(ConfigError::Invalid(format!(
                "unknown score output '{}' (expected probability or label)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// In [0, 1]
    pub risk_score: f32,
    pub model: String,
    pub tier: RiskTier,
    pub recommendation: String,
}

/// Run the model once on `vector`. No retries, no fallback model.
pub fn score(
    vector: &FeatureVector,
    model: &dyn RiskModel,
    model_name: &str,
    output: ScoreOutput,
) -> ScoringResult<PredictionResult> {
    let raw = match output {
        ScoreOutput::Probability => model.predict_proba(vector.as_slice())?[1],
        ScoreOutput::Label => model.predict(vector.as_slice())?,
    };

    if !raw.is_finite() {
        return Err(ScoringError::ModelInvocation(format!(
            "model '{}' returned a non-finite score",
            model_name
        )));
    }

    let risk_score = raw.clamp(0.0, 1.0);
    let tier = RiskTier::from_score(risk_score);

    log::debug!("Model '{}' scored {:.4} ({})", model_name, risk_score, tier);

    Ok(PredictionResult {
        risk_score,
        model: model_name.to_string(),
        tier,
        recommendation: tier.recommendation().to_string(),
    })
}

/// Round to 3 decimals for responses
pub fn round_score(score: f32) -> f64 {
    (f64::from(score) * 1000.0).round() / 1000.0
}
