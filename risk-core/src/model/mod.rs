//! Model Module - Inference wrappers
//!
//! The classifier is opaque to the rest of the crate: anything exposing
//! `predict` / `predict_proba` over a positional vector can be plugged in.

pub mod linear;
pub mod tree;
pub mod mlp;
pub mod artifact;
pub mod registry;
pub mod cache;
#[cfg(feature = "onnx")]
pub mod onnx;

use crate::error::{ScoringError, ScoringResult};

// Re-export common types
pub use artifact::{load_model, ArtifactBody, LoadedModel, ModelArtifact, ModelMetrics};
pub use registry::ModelRegistry;
pub use cache::{ModelCache, ModelStatus};

/// Class boundary for `predict`
pub const DECISION_THRESHOLD: f32 = 0.5;

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// Binary risk classifier
pub trait RiskModel: Send + Sync {
    /// Short model family name ("logistic", "tree_ensemble", ...)
    fn kind(&self) -> &'static str;

    /// Number of input features, when the model knows it
    fn input_width(&self) -> Option<usize>;

    /// `[p(no risk), p(risk)]`
    fn predict_proba(&self, features: &[f32]) -> ScoringResult<[f32; 2]>;

    /// Class label (0.0 or 1.0)
    fn predict(&self, features: &[f32]) -> ScoringResult<f32> {
        let proba = self.predict_proba(features)?;
        Ok(if proba[1] > DECISION_THRESHOLD { 1.0 } else { 0.0 })
    }

    /// Per-feature importances in input order, when available
    fn feature_importances(&self) -> Option<Vec<f32>> {
        None
    }
}

// ============================================================================
// HELPERS
// ============================================================================

pub(crate) fn sigmoid(x: f32) -> f32 {
    if x > 20.0 {
        1.0
    } else if x < -20.0 {
        0.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

pub(crate) fn check_width(expected: Option<usize>, features: &[f32]) -> ScoringResult<()> {
    match expected {
        Some(width) if width != features.len() => Err(ScoringError::ModelInvocation(format!(
            "expected {} features, got {}",
            width,
            features.len()
        ))),
        _ => Ok(()),
    }
}

/// Scale to sum 1; all-zero input stays all-zero
pub(crate) fn normalize(mut values: Vec<f32>) -> Vec<f32> {
    let total: f32 = values.iter().sum();
    if total > 0.0 {
        for v in values.iter_mut() {
            *v /= total;
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(1.0) > 0.5);
        assert!(sigmoid(-1.0) < 0.5);
        assert_eq!(sigmoid(25.0), 1.0);
        assert_eq!(sigmoid(-25.0), 0.0);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(vec![1.0, 3.0]), vec![0.25, 0.75]);
        assert_eq!(normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_check_width() {
        assert!(check_width(Some(2), &[1.0, 2.0]).is_ok());
        assert!(check_width(None, &[1.0]).is_ok());
        assert!(matches!(
            check_width(Some(3), &[1.0]),
            Err(ScoringError::ModelInvocation(_))
        ));
    }
}
