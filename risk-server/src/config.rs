//! Configuration module

use std::env;
use std::path::PathBuf;

use malaria_risk_core::config::ConfigPaths;
use malaria_risk_core::features::EncodingPolicy;
use malaria_risk_core::model::registry::{DEFAULT_MODEL, DEFAULT_MODEL_NAMES};
use malaria_risk_core::{ConfigError, ScoreOutput};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding model artifacts
    pub model_dir: PathBuf,

    /// Ordered model columns (JSON array)
    pub feature_columns: PathBuf,

    /// Raw field → model column mapping (JSON object)
    pub field_map: PathBuf,

    /// Dashboard model columns; derived from the form when unset
    pub dashboard_columns: Option<PathBuf>,

    /// Model behind the dashboard
    pub dashboard_model: String,

    /// Directory holding dashboard model artifacts
    pub dashboard_model_dir: PathBuf,

    /// Models served by `/predict`
    pub model_names: Vec<String>,

    /// Model used when a request names none
    pub default_model: String,

    pub encoding: EncodingPolicy,

    pub category_vocabulary: Option<PathBuf>,

    /// Risk score source. `label` returns the class label, as the legacy
    /// Flask service's `/predict` did; `probability` is the default.
    pub score_output: ScoreOutput,

    /// Invalidate cached models when their artifact changes
    pub watch_models: bool,

    /// Environment (development, production); production logs as JSON
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_dir = PathBuf::from(lookup("MODEL_DIR").unwrap_or_else(|| "models".to_string()));

        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: {}", p)))?,
            None => 5000,
        };

        let model_names = match lookup("MODEL_NAMES") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_MODEL_NAMES.iter().map(|s| s.to_string()).collect(),
        };

        let encoding = match lookup("CATEGORICAL_ENCODING") {
            Some(v) => v.parse()?,
            None => EncodingPolicy::default(),
        };

        let score_output = match lookup("SCORE_OUTPUT") {
            Some(v) => v.parse()?,
            None => ScoreOutput::default(),
        };

        let watch_models = match lookup("WATCH_MODELS") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                ConfigError::Invalid(format!("WATCH_MODELS must be true or false, got {}", v))
            })?,
            None => false,
        };

        Ok(Self {
            port,
            feature_columns: lookup("FEATURE_COLUMNS")
                .map(PathBuf::from)
                .unwrap_or_else(|| model_dir.join("feature_columns.json")),
            field_map: lookup("FIELD_MAP")
                .map(PathBuf::from)
                .unwrap_or_else(|| model_dir.join("field_map.json")),
            dashboard_columns: lookup("DASHBOARD_COLUMNS").map(PathBuf::from),
            dashboard_model: lookup("DASHBOARD_MODEL")
                .unwrap_or_else(|| "random_forest".to_string()),
            dashboard_model_dir: lookup("DASHBOARD_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| model_dir.join("dashboard")),
            model_names,
            default_model: lookup("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            encoding,
            category_vocabulary: lookup("CATEGORY_VOCABULARY").map(PathBuf::from),
            score_output,
            watch_models,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            model_dir,
        })
    }

    /// Static configuration files for the scoring core
    pub fn paths(&self) -> ConfigPaths {
        ConfigPaths {
            feature_columns: self.feature_columns.clone(),
            field_map: self.field_map.clone(),
            dashboard_columns: self.dashboard_columns.clone(),
            category_vocabulary: self.category_vocabulary.clone(),
            encoding: self.encoding,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
