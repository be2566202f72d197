//! Column Layout - Ordered model column definition
//!
//! **This type controls the feature schema handed to the model.**
//!
//! ## Rules:
//! 1. Column order is the positional order the model was trained on
//! 2. Names are unique and non-blank
//! 3. The spec is loaded once at startup and never mutated
//!
//! A CRC32 hash over the ordered names travels with every `FeatureVector`
//! so a vector built against one layout is never fed to another.

use std::collections::HashMap;
use std::path::Path;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::read_json;
use crate::error::ConfigError;

// ============================================================================
// COLUMN SPEC
// ============================================================================

/// Ordered list of model column names (`feature_columns.json`)
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    names: Vec<String>,
    index: HashMap<String, usize>,
    hash: u32,
}

impl ColumnSpec {
    /// Build from names, rejecting empty, blank or duplicate columns
    pub fn new(names: Vec<String>) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::Invalid("column spec is empty".to_string()));
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("column {} has a blank name", i)));
            }
            if index.insert(name.clone(), i).is_some() {
                return Err(ConfigError::Invalid(format!("duplicate column '{}'", name)));
            }
        }

        let hash = compute_layout_hash(&names);
        Ok(Self { names, index, hash })
    }

    /// Load from a JSON array of column names
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let names: Vec<String> = read_json(path)?;
        let spec = Self::new(names)?;
        log::info!(
            "Loaded column spec from {} ({} columns, hash {:08x})",
            path.display(),
            spec.len(),
            spec.layout_hash()
        );
        Ok(spec)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get column index by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Get column name by index
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn layout_hash(&self) -> u32 {
        self.hash
    }

    pub fn info(&self) -> LayoutInfo {
        LayoutInfo {
            hash: self.hash,
            column_count: self.names.len(),
            columns: self.names.clone(),
        }
    }
}

impl PartialEq for ColumnSpec {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the ordered column names, NUL separated
pub fn compute_layout_hash(names: &[String]) -> u32 {
    let mut hasher = Hasher::new();
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub hash: u32,
    pub column_count: usize,
    pub columns: Vec<String>,
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Vector was assembled against a different column layout
#[derive(Debug, Clone, Error)]
#[error(
    "feature layout mismatch: expected {expected_len} columns (hash {expected_hash:08x}), \
     got {actual_len} columns (hash {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_hash: u32,
    pub expected_len: usize,
    pub actual_hash: u32,
    pub actual_len: usize,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_spec_preserves_order() {
        let spec = ColumnSpec::new(names(&["Age", "Household_Size", "Sex_Female"])).unwrap();
        assert_eq!(spec.len(), 3);
        assert_eq!(spec.index_of("Age"), Some(0));
        assert_eq!(spec.index_of("Sex_Female"), Some(2));
        assert_eq!(spec.name_at(1), Some("Household_Size"));
        assert_eq!(spec.name_at(3), None);
        assert_eq!(spec.index_of("nonexistent"), None);
    }

    #[test]
    fn test_empty_spec_rejected() {
        assert!(matches!(ColumnSpec::new(vec![]), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = ColumnSpec::new(names(&["Age", "Age"]));
        assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_blank_column_rejected() {
        assert!(ColumnSpec::new(names(&["Age", "  "])).is_err());
    }

    #[test]
    fn test_layout_hash_depends_on_order() {
        let a = ColumnSpec::new(names(&["Age", "Month"])).unwrap();
        let b = ColumnSpec::new(names(&["Month", "Age"])).unwrap();
        let c = ColumnSpec::new(names(&["Age", "Month"])).unwrap();
        assert_ne!(a.layout_hash(), b.layout_hash());
        assert_eq!(a.layout_hash(), c.layout_hash());
        assert_ne!(a.layout_hash(), 0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature_columns.json");
        std::fs::write(&path, r#"["Household_Size", "Age", "Month"]"#).unwrap();

        let spec = ColumnSpec::load(&path).unwrap();
        assert_eq!(spec.names(), &names(&["Household_Size", "Age", "Month"])[..]);
        assert_eq!(spec.info().column_count, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ColumnSpec::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature_columns.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();
        assert!(matches!(ColumnSpec::load(&path), Err(ConfigError::Parse { .. })));
    }
}
