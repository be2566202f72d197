//! Model Registry - static name → artifact path mapping

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ScoringError, ScoringResult};

/// Model names served by default
pub const DEFAULT_MODEL_NAMES: &[&str] = &["random_forest", "xgboost", "neural_net"];

/// Model used when a request names none
pub const DEFAULT_MODEL: &str = "xgboost";

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRegistry {
    artifacts: BTreeMap<String, PathBuf>,
    default_model: String,
}

impl ModelRegistry {
    pub fn new(
        artifacts: BTreeMap<String, PathBuf>,
        default_model: &str,
    ) -> Result<Self, ConfigError> {
        if artifacts.is_empty() {
            return Err(ConfigError::Invalid("no models configured".to_string()));
        }
        if !artifacts.contains_key(default_model) {
            return Err(ConfigError::Invalid(format!(
                "default model '{}' is not among the configured models",
                default_model
            )));
        }
        Ok(Self {
            artifacts,
            default_model: default_model.to_string(),
        })
    }

    /// `<dir>/<name>.json`, or `<dir>/<name>.onnx` when only that exists
    pub fn from_dir(
        dir: &Path,
        names: &[String],
        default_model: &str,
    ) -> Result<Self, ConfigError> {
        let artifacts = names
            .iter()
            .map(|name| (name.clone(), artifact_path(dir, name)))
            .collect();
        Self::new(artifacts, default_model)
    }

    /// Registry holding one model, which is also the default
    pub fn single(name: &str, path: PathBuf) -> Self {
        let mut artifacts = BTreeMap::new();
        artifacts.insert(name.to_string(), path);
        Self {
            artifacts,
            default_model: name.to_string(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    /// Resolve an optional request name; never falls back on unknown names
    pub fn resolve<'a>(&'a self, name: Option<&'a str>) -> ScoringResult<(&'a str, &'a Path)> {
        let name = name.unwrap_or(self.default_model.as_str());
        self.artifacts
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p.as_path()))
            .ok_or_else(|| ScoringError::UnknownModel(name.to_string()))
    }

    /// Names whose artifact has the same file name as `path`
    pub fn names_for_path(&self, path: &Path) -> Vec<String> {
        let Some(file_name) = path.file_name() else {
            return Vec::new();
        };
        self.artifacts
            .iter()
            .filter(|(_, p)| p.file_name() == Some(file_name))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Fail fast when an artifact file is missing
    pub fn check_artifacts_exist(&self) -> Result<(), ConfigError> {
        for (name, path) in &self.artifacts {
            if !path.is_file() {
                return Err(ConfigError::Invalid(format!(
                    "artifact for model '{}' not found at {}",
                    name,
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

fn artifact_path(dir: &Path, name: &str) -> PathBuf {
    let json = dir.join(format!("{}.json", name));
    let onnx = dir.join(format!("{}.onnx", name));
    if !json.exists() && onnx.exists() {
        onnx
    } else {
        json
    }
}
