//! Field Map - raw request field → model column renaming

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::read_json;
use crate::error::ConfigError;
use super::layout::ColumnSpec;

/// Mapping from raw external field names to model column names
/// (`field_map.json`). Raw keys absent from the map are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: BTreeMap<String, String>,
}

impl FieldMap {
    pub fn new(entries: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        if let Some((raw, _)) = entries.iter().find(|(_, column)| column.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "field map entry '{}' has a blank target column",
                raw
            )));
        }
        Ok(Self { entries })
    }

    /// Load from a JSON object `{ "raw_field": "Model_Column", ... }`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let entries: BTreeMap<String, String> = read_json(path)?;
        let map = Self::new(entries)?;
        log::info!("Loaded field map from {} ({} fields)", path.display(), map.len());
        Ok(map)
    }

    pub fn get(&self, raw_field: &str) -> Option<&str> {
        self.entries.get(raw_field).map(String::as_str)
    }

    /// (raw field, model column) pairs in raw-field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target columns that the column spec does not know about.
    /// Their values are renamed and then never reach the model.
    pub fn unmapped_targets<'a>(&'a self, spec: &ColumnSpec) -> Vec<&'a str> {
        self.entries
            .values()
            .map(String::as_str)
            .filter(|column| !spec.contains(column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_field_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field_map.json");
        std::fs::write(&path, r#"{"household_size": "Household_Size", "age": "Age"}"#).unwrap();

        let map = FieldMap::load(&path).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("age"), Some("Age"));
        assert_eq!(map.get("Age"), None);
    }

    #[test]
    fn test_blank_target_rejected() {
        let mut entries = BTreeMap::new();
        entries.insert("age".to_string(), " ".to_string());
        assert!(FieldMap::new(entries).is_err());
    }

    #[test]
    fn test_unmapped_targets() {
        let mut entries = BTreeMap::new();
        entries.insert("age".to_string(), "Age".to_string());
        entries.insert("zone".to_string(), "Zone".to_string());
        let map = FieldMap::new(entries).unwrap();
        let spec = ColumnSpec::new(vec!["Age".to_string()]).unwrap();

        assert_eq!(map.unmapped_targets(&spec), vec!["Zone"]);
    }
}
