//! Feature Vector - Core data structure for model input
//!
//! **Layout-tagged feature vector**
//!
//! Values are positional: index `i` holds the column `spec.name_at(i)`.
//! The layout hash records which `ColumnSpec` the vector was built against.

use serde::{Deserialize, Serialize};

use super::layout::{ColumnSpec, LayoutMismatchError};

/// Assembled model input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// CRC32 hash of the column layout
    pub layout_hash: u32,
    /// Values in column spec order
    pub values: Vec<f32>,
}

impl FeatureVector {
    /// All-zero vector for a layout
    pub fn zeroed(spec: &ColumnSpec) -> Self {
        Self {
            layout_hash: spec.layout_hash(),
            values: vec![0.0; spec.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, spec: &ColumnSpec, name: &str) -> Option<f32> {
        spec.index_of(name).and_then(|i| self.get(i))
    }

    /// Check the vector matches `spec` in hash and length
    pub fn validate(&self, spec: &ColumnSpec) -> Result<(), LayoutMismatchError> {
        if self.layout_hash != spec.layout_hash() || self.values.len() != spec.len() {
            return Err(LayoutMismatchError {
                expected_hash: spec.layout_hash(),
                expected_len: spec.len(),
                actual_hash: self.layout_hash,
                actual_len: self.values.len(),
            });
        }
        Ok(())
    }

    /// JSON form with named values, for debug logging
    pub fn to_log_entry(&self, spec: &ColumnSpec) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": spec.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ColumnSpec {
        ColumnSpec::new(vec!["Age".to_string(), "Month".to_string()]).unwrap()
    }

    #[test]
    fn test_zeroed_matches_layout() {
        let spec = spec();
        let vector = FeatureVector::zeroed(&spec);
        assert_eq!(vector.values, vec![0.0, 0.0]);
        assert!(vector.validate(&spec).is_ok());
    }

    #[test]
    fn test_get_by_name() {
        let spec = spec();
        let vector = FeatureVector { layout_hash: spec.layout_hash(), values: vec![30.0, 7.0] };
        assert_eq!(vector.get_by_name(&spec, "Month"), Some(7.0));
        assert_eq!(vector.get_by_name(&spec, "nonexistent"), None);
    }

    #[test]
    fn test_validate_rejects_other_layout() {
        let other = ColumnSpec::new(vec!["Month".to_string(), "Age".to_string()]).unwrap();
        let vector = FeatureVector::zeroed(&other);
        assert!(vector.validate(&spec()).is_err());
    }

    #[test]
    fn test_to_log_entry() {
        let spec = spec();
        let vector = FeatureVector { layout_hash: spec.layout_hash(), values: vec![18.0, 0.0] };

        let log = vector.to_log_entry(&spec);
        assert_eq!(log["named_values"]["Age"], 18.0);
        assert!(log["layout_hash"].as_u64().is_some());
    }
}
