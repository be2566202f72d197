//! Model artifacts - on-disk model files
//!
//! JSON artifacts are tagged by `"type"` (`logistic`, `tree_ensemble`, `mlp`)
//! and may carry metadata shared by every family. `.onnx` files are handled
//! by the `onnx` feature.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ConfigError, ScoringResult};
use crate::features::ColumnSpec;
use super::linear::LogisticModel;
use super::mlp::MlpModel;
use super::tree::TreeEnsemble;
use super::RiskModel;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Offline evaluation metrics recorded at training time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: Option<f32>,
    pub precision: Option<f32>,
    pub recall: Option<f32>,
    pub f1_score: Option<f32>,
    pub auc_roc: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactBody {
    Logistic(LogisticModel),
    TreeEnsemble(TreeEnsemble),
    Mlp(MlpModel),
}

impl ArtifactBody {
    fn as_model(&self) -> &dyn RiskModel {
        match self {
            ArtifactBody::Logistic(m) => m,
            ArtifactBody::TreeEnsemble(m) => m,
            ArtifactBody::Mlp(m) => m,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ArtifactBody::Logistic(m) => m.validate(),
            ArtifactBody::TreeEnsemble(m) => m.validate(),
            ArtifactBody::Mlp(m) => m.validate(),
        }
    }
}

/// A JSON model file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub name: Option<String>,
    /// Column names the model was trained on, in order
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Explicit importances, overriding what the model family derives
    #[serde(default)]
    pub feature_importances: Option<Vec<f32>>,
    #[serde(default)]
    pub metrics: Option<ModelMetrics>,
    #[serde(flatten)]
    pub model: ArtifactBody,
}

impl ModelArtifact {
    /// Check internal structure and agreement with the column layout
    pub fn validate(&self, spec: &ColumnSpec) -> Result<(), ConfigError> {
        self.model.validate()?;

        if let Some(width) = self.model.as_model().input_width() {
            if width != spec.len() {
                return Err(ConfigError::Invalid(format!(
                    "model expects {} features but the column spec has {}",
                    width,
                    spec.len()
                )));
            }
        }

        if let Some(names) = &self.feature_names {
            if names.as_slice() != spec.names() {
                return Err(ConfigError::Invalid(
                    "model feature_names do not match the column spec".to_string(),
                ));
            }
        }

        if let Some(importances) = &self.feature_importances {
            if importances.len() != spec.len() {
                return Err(ConfigError::Invalid(format!(
                    "model lists {} importances for {} columns",
                    importances.len(),
                    spec.len()
                )));
            }
        }
        Ok(())
    }
}

impl RiskModel for ModelArtifact {
    fn kind(&self) -> &'static str {
        self.model.as_model().kind()
    }

    fn input_width(&self) -> Option<usize> {
        self.model.as_model().input_width()
    }

    fn predict_proba(&self, features: &[f32]) -> ScoringResult<[f32; 2]> {
        self.model.as_model().predict_proba(features)
    }

    fn feature_importances(&self) -> Option<Vec<f32>> {
        self.feature_importances
            .clone()
            .or_else(|| self.model.as_model().feature_importances())
    }
}

/// A model loaded into memory, with provenance
#[derive(Clone)]
pub struct LoadedModel {
    pub name: String,
    pub path: PathBuf,
    /// Hex SHA-256 of the artifact bytes
    pub sha256: String,
    pub loaded_at: DateTime<Utc>,
    pub metrics: Option<ModelMetrics>,
    pub model: Arc<dyn RiskModel>,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("kind", &self.model.kind())
            .field("sha256", &self.sha256)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Load and validate an artifact against `spec`
pub fn load_model(name: &str, path: &Path, spec: &ColumnSpec) -> Result<LoadedModel, ConfigError> {
    log::info!("Loading model '{}' from: {}", name, path.display());

    let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sha256 = hex::encode(Sha256::digest(&bytes));

    let is_onnx = path.extension().map_or(false, |e| e == "onnx");
    let (model, metrics): (Arc<dyn RiskModel>, Option<ModelMetrics>) = if is_onnx {
        (load_onnx(path, &bytes, spec)?, None)
    } else {
        let artifact: ModelArtifact =
            serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        artifact
            .validate(spec)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;
        let metrics = artifact.metrics.clone();
        (Arc::new(artifact), metrics)
    };

    log::info!(
        "Model '{}' loaded ({}, sha256 {})",
        name,
        model.kind(),
        &sha256[..12]
    );

    Ok(LoadedModel {
        name: name.to_string(),
        path: path.to_path_buf(),
        sha256,
        loaded_at: Utc::now(),
        metrics,
        model,
    })
}

#[cfg(feature = "onnx")]
fn load_onnx(
    path: &Path,
    bytes: &[u8],
    spec: &ColumnSpec,
) -> Result<Arc<dyn RiskModel>, ConfigError> {
    let model = super::onnx::OnnxModel::from_bytes(bytes, spec.len())
        .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(
    path: &Path,
    _bytes: &[u8],
    _spec: &ColumnSpec,
) -> Result<Arc<dyn RiskModel>, ConfigError> {
    Err(ConfigError::Invalid(format!(
        "{}: ONNX models require the `onnx` feature",
        path.display()
    )))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ColumnSpec {
        ColumnSpec::new(vec!["Age".to_string(), "Month".to_string()]).unwrap()
    }

    const LOGISTIC: &str = r#"{
        "type": "logistic",
        "name": "baseline",
        "feature_names": ["Age", "Month"],
        "metrics": {"accuracy": 0.89, "auc_roc": 0.94},
        "intercept": -1.0,
        "coefficients": [0.02, 0.1]
    }"#;

    #[test]
    fn test_parse_tagged_artifact() {
        let artifact: ModelArtifact = serde_json::from_str(LOGISTIC).unwrap();
        assert!(matches!(artifact.model, ArtifactBody::Logistic(_)));
        assert_eq!(artifact.kind(), "logistic");
        assert_eq!(artifact.metrics.as_ref().unwrap().accuracy, Some(0.89));
        artifact.validate(&spec()).unwrap();
    }

    #[test]
    fn test_feature_names_must_match_spec() {
        let artifact: ModelArtifact = serde_json::from_str(LOGISTIC).unwrap();
        let other = ColumnSpec::new(vec!["Month".to_string(), "Age".to_string()]).unwrap();
        assert!(artifact.validate(&other).is_err());
    }

    #[test]
    fn test_explicit_importances_win() {
        let mut artifact: ModelArtifact = serde_json::from_str(LOGISTIC).unwrap();
        artifact.feature_importances = Some(vec![0.9, 0.1]);
        assert_eq!(artifact.feature_importances(), Some(vec![0.9, 0.1]));
    }

    #[test]
    fn test_load_model_records_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xgboost.json");
        std::fs::write(&path, LOGISTIC).unwrap();

        let loaded = load_model("xgboost", &path, &spec()).unwrap();
        assert_eq!(loaded.name, "xgboost");
        assert_eq!(loaded.sha256.len(), 64);
        assert_eq!(loaded.model.kind(), "logistic");
        assert!(loaded.metrics.is_some());
    }

    #[test]
    fn test_load_model_width_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"type": "logistic", "intercept": 0, "coefficients": [1, 2, 3]}"#)
            .unwrap();

        let result = load_model("bad", &path, &spec());
        assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("3 features")));
    }

    #[test]
    fn test_load_model_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("svm.json");
        std::fs::write(&path, r#"{"type": "svm", "support_vectors": []}"#).unwrap();
        assert!(matches!(load_model("svm", &path, &spec()), Err(ConfigError::Parse { .. })));
    }
}
