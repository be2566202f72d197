//! Static Configuration - column layout, field map, encoding policy
//!
//! Loaded once at startup by `ScoringConfig::load` and passed by reference
//! afterwards. Any problem here is fatal.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::features::{
    CategoricalEncoding, CategoryVocabulary, ColumnSpec, EncodingPolicy, FieldMap,
};

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Where the static configuration lives
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub feature_columns: PathBuf,
    pub field_map: PathBuf,
    pub dashboard_columns: Option<PathBuf>,
    pub category_vocabulary: Option<PathBuf>,
    pub encoding: EncodingPolicy,
}

impl ConfigPaths {
    /// `feature_columns.json` and `field_map.json` under `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            feature_columns: dir.join("feature_columns.json"),
            field_map: dir.join("field_map.json"),
            dashboard_columns: None,
            category_vocabulary: None,
            encoding: EncodingPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub columns: ColumnSpec,
    pub field_map: FieldMap,
    pub encoding: CategoricalEncoding,
    /// Layout of the dashboard model, when it differs from the form-derived one
    pub dashboard_columns: Option<ColumnSpec>,
}

impl ScoringConfig {
    pub fn load(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        let columns = ColumnSpec::load(&paths.feature_columns)?;
        let field_map = FieldMap::load(&paths.field_map)?;

        let unmapped = field_map.unmapped_targets(&columns);
        if !unmapped.is_empty() {
            log::warn!(
                "Field map targets not in the column spec (values will be dropped): {:?}",
                unmapped
            );
        }

        let encoding = match paths.encoding {
            EncodingPolicy::PerBatch => {
                log::warn!(
                    "Categorical encoding is per-batch: category codes depend on the \
                     values present in each request, not on training"
                );
                CategoricalEncoding::PerBatch
            }
            EncodingPolicy::Vocabulary => {
                let path = paths.category_vocabulary.as_deref().ok_or_else(|| {
                    ConfigError::Invalid(
                        "vocabulary encoding requires a category vocabulary file".to_string(),
                    )
                })?;
                CategoricalEncoding::Vocabulary(CategoryVocabulary::load(path)?)
            }
        };

        let dashboard_columns = paths
            .dashboard_columns
            .as_deref()
            .map(ColumnSpec::load)
            .transpose()?;

        log::info!(
            "Scoring config loaded: {} columns (hash {:08x}), {} mapped fields, {} encoding",
            columns.len(),
            columns.layout_hash(),
            field_map.len(),
            paths.encoding.as_str()
        );

        Ok(Self {
            columns,
            field_map,
            encoding,
            dashboard_columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_basic(dir: &Path) -> ConfigPaths {
        fs::write(
            dir.join("feature_columns.json"),
            r#"["Household_Size", "State", "Age"]"#,
        )
        .unwrap();
        fs::write(
            dir.join("field_map.json"),
            r#"{"household_size": "Household_Size", "state": "State"}"#,
        )
        .unwrap();
        ConfigPaths::in_dir(dir)
    }

    #[test]
    fn test_load_basic() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_basic(dir.path());

        let config = ScoringConfig::load(&paths).unwrap();
        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.field_map.get("state"), Some("State"));
        assert_eq!(config.encoding.policy(), EncodingPolicy::PerBatch);
        assert!(config.dashboard_columns.is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());
        assert!(matches!(ScoringConfig::load(&paths), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_basic(dir.path());
        fs::write(&paths.field_map, "{not json").unwrap();
        assert!(matches!(ScoringConfig::load(&paths), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_vocabulary_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = write_basic(dir.path());
        paths.encoding = EncodingPolicy::Vocabulary;
        assert!(matches!(ScoringConfig::load(&paths), Err(ConfigError::Invalid(_))));

        let vocab = dir.path().join("vocabulary.json");
        fs::write(&vocab, r#"{"State": ["Abia", "Lagos"]}"#).unwrap();
        paths.category_vocabulary = Some(vocab);
        let config = ScoringConfig::load(&paths).unwrap();
        assert_eq!(config.encoding.policy(), EncodingPolicy::Vocabulary);
    }

    #[test]
    fn test_dashboard_columns_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = write_basic(dir.path());
        let dash = dir.path().join("dashboard_columns.json");
        fs::write(&dash, r#"["Age", "Sex_Female", "Sex_Male"]"#).unwrap();
        paths.dashboard_columns = Some(dash);

        let config = ScoringConfig::load(&paths).unwrap();
        assert_eq!(config.dashboard_columns.unwrap().len(), 3);
    }
}
