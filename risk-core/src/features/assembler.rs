//! Feature Assembler - raw input → positional feature vector
//!
//! Single pass, no I/O:
//! 1. rename through the `FieldMap` (HTTP) or expand one-hot groups (dashboard)
//! 2. encode remaining categorical values
//! 3. emit one value per `ColumnSpec` column, in order, 0 when absent
//!
//! Unknown raw keys are ignored. Missing raw keys are never an error.

use serde_json::{Map, Value};

use crate::error::{ScoringError, ScoringResult};
use super::encoding::{CategoricalEncoding, Cell, NumericRecord, Record};
use super::field_map::FieldMap;
use super::layout::ColumnSpec;
use super::onehot::OneHotGroup;
use super::vector::FeatureVector;

/// Raw key/value input from a JSON body or a form
pub type RawInput = Map<String, Value>;

// ============================================================================
// HTTP VARIANT (field map + categorical encoding)
// ============================================================================

/// Assemble one record with the default per-batch encoding
pub fn assemble(raw: &RawInput, spec: &ColumnSpec, field_map: Option<&FieldMap>) -> FeatureVector {
    assemble_batch(std::slice::from_ref(raw), spec, field_map, &CategoricalEncoding::PerBatch)
        .pop()
        .unwrap_or_else(|| FeatureVector::zeroed(spec))
}

/// Assemble a batch. Per-batch encoding sees every record of `raws`.
pub fn assemble_batch(
    raws: &[RawInput],
    spec: &ColumnSpec,
    field_map: Option<&FieldMap>,
    encoding: &CategoricalEncoding,
) -> Vec<FeatureVector> {
    let records: Vec<Record> = raws
        .iter()
        .map(|raw| match field_map {
            Some(map) => rename(raw, map),
            None => coerce_all(raw),
        })
        .collect();

    encoding
        .encode_batch(&records, spec.iter())
        .iter()
        .map(|record| to_vector(record, spec))
        .collect()
}

/// `{ field_map[k]: raw[k] | k in field_map and k in raw }`
fn rename(raw: &RawInput, map: &FieldMap) -> Record {
    let mut record = Record::new();
    for (raw_field, column) in map.iter() {
        if let Some(cell) = raw.get(raw_field).and_then(Cell::from_json) {
            record.insert(column.to_string(), cell);
        }
    }
    record
}

fn coerce_all(raw: &RawInput) -> Record {
    raw.iter()
        .filter_map(|(k, v)| Cell::from_json(v).map(|cell| (k.clone(), cell)))
        .collect()
}

fn to_vector(record: &NumericRecord, spec: &ColumnSpec) -> FeatureVector {
    FeatureVector {
        layout_hash: spec.layout_hash(),
        values: spec
            .iter()
            .map(|column| record.get(column).copied().unwrap_or(0.0))
            .collect(),
    }
}

// ============================================================================
// DASHBOARD VARIANT (one-hot expansion)
// ============================================================================

/// Assemble a form record, expanding each group's selection into dummy
/// columns. Every group must have a string selection among its options.
/// Non-numeric values of other fields are ignored.
pub fn assemble_one_hot(
    raw: &RawInput,
    spec: &ColumnSpec,
    groups: &[OneHotGroup],
) -> ScoringResult<FeatureVector> {
    let mut record = NumericRecord::new();

    for (key, value) in raw {
        if groups.iter().any(|g| g.field == *key) {
            continue;
        }
        match Cell::from_json(value) {
            Some(Cell::Number(v)) => {
                record.insert(key.clone(), v);
            }
            Some(Cell::Category(_)) => {
                log::debug!("Ignoring non-numeric value for {}", key);
            }
            None => {}
        }
    }

    for group in groups {
        let selected = raw
            .get(&group.field)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ScoringError::Validation(format!("{} requires a selection", group.field))
            })?;

        for (column, flag) in group.expand(selected)? {
            record.insert(column, flag);
        }
    }

    Ok(to_vector(&record, spec))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use serde_json::json;

    fn spec(names: &[&str]) -> ColumnSpec {
        ColumnSpec::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn raw(value: Value) -> RawInput {
        value.as_object().cloned().unwrap()
    }

    fn field_map(pairs: &[(&str, &str)]) -> FieldMap {
        FieldMap::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_output_follows_spec_order() {
        let spec = spec(&["Month", "Age", "Household_Size"]);
        let input = raw(json!({"Household_Size": 4, "Age": 18, "Month": 7}));
        let vector = assemble(&input, &spec, None);

        assert_eq!(vector.values, vec![7.0, 18.0, 4.0]);
        assert_eq!(vector.len(), spec.len());
        assert!(vector.validate(&spec).is_ok());
    }

    #[test]
    fn test_missing_columns_are_zero() {
        let spec = spec(&["Age", "Climate_Score", "Cluster"]);
        let vector = assemble(&raw(json!({"Age": 40})), &spec, None);
        assert_eq!(vector.values, vec![40.0, 0.0, 0.0]);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let spec = spec(&["Age"]);
        let vector = assemble(&raw(json!({"Age": 40, "favourite_colour": "blue"})), &spec, None);
        assert_eq!(vector.values, vec![40.0]);
    }

    #[test]
    fn test_field_map_renames_and_filters() {
        let spec = spec(&["Household_Size", "Net_Usage", "Age"]);
        let map = field_map(&[
            ("household_size", "Household_Size"),
            ("net_usage_rate", "Net_Usage"),
        ]);
        let input = raw(json!({
            "household_size": 5,
            "net_usage_rate": 0.8,
            "Age": 30,
            "model": "xgboost"
        }));

        let vector = assemble(&input, &spec, Some(&map));

        // Age is not in the field map, so it is dropped even though the spec has it
        assert_eq!(vector.values, vec![5.0, 0.8, 0.0]);
    }

    #[test]
    fn test_field_map_categorical_single_row() {
        let spec = spec(&["State", "Household_Size"]);
        let map = field_map(&[("state", "State"), ("household_size", "Household_Size")]);
        let input = raw(json!({"state": "Lagos", "household_size": 5}));
        let vector = assemble(&input, &spec, Some(&map));
        assert_eq!(vector.values, vec![0.0, 5.0]);
    }

    #[test]
    fn test_batch_shares_encoding() {
        let spec = spec(&["State"]);
        let map = field_map(&[("state", "State")]);
        let batch = vec![
            raw(json!({"state": "Kano"})),
            raw(json!({"state": "Lagos"})),
            raw(json!({"state": "Kano"})),
        ];

        let vectors = assemble_batch(&batch, &spec, Some(&map), &CategoricalEncoding::PerBatch);
        let codes: Vec<f32> = vectors.iter().map(|v| v.values[0]).collect();
        assert_eq!(codes, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_null_and_bool_values() {
        let spec = spec(&["Pregnant", "Recent_Fever"]);
        let vector = assemble(&raw(json!({"Pregnant": null, "Recent_Fever": true})), &spec, None);
        assert_eq!(vector.values, vec![0.0, 1.0]);
    }

    fn groups() -> Vec<OneHotGroup> {
        vec![
            OneHotGroup::new("Sex", vec!["Female".to_string(), "Male".to_string()]),
            OneHotGroup::new(
                "State",
                vec!["Kano".to_string(), "Lagos".to_string(), "Rivers".to_string()],
            ),
        ]
    }

    #[test]
    fn test_one_hot_example() {
        let spec = spec(&[
            "Household_Size", "Age", "Sex_Female", "Sex_Male",
            "State_Kano", "State_Lagos", "State_Rivers",
        ]);
        let input = raw(json!({
            "Household_Size": 4,
            "Age": 18,
            "Sex": "Female",
            "State": "Rivers"
        }));

        let vector = assemble_one_hot(&input, &spec, &groups()).unwrap();

        assert_eq!(vector.get_by_name(&spec, "Sex_Female"), Some(1.0));
        assert_eq!(vector.get_by_name(&spec, "Sex_Male"), Some(0.0));
        assert_eq!(vector.values, vec![4.0, 18.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_groups_sum_to_one() {
        let spec = spec(&["Sex_Female", "Sex_Male", "State_Kano", "State_Lagos", "State_Rivers"]);
        for state in ["Kano", "Lagos", "Rivers"] {
            let input = raw(json!({"Sex": "Male", "State": state}));
            let vector = assemble_one_hot(&input, &spec, &groups()).unwrap();

            let sex: f32 = vector.values[0..2].iter().sum();
            let states: f32 = vector.values[2..5].iter().sum();
            assert_eq!(sex, 1.0);
            assert_eq!(states, 1.0);
        }
    }

    #[test]
    fn test_one_hot_missing_selection() {
        let spec = spec(&["Sex_Female", "Sex_Male"]);
        let result = assemble_one_hot(&raw(json!({"Sex": "Female"})), &spec, &groups());
        assert!(matches!(result, Err(ScoringError::Validation(msg)) if msg.contains("State")));
    }

    #[test]
    fn test_one_hot_invalid_option() {
        let spec = spec(&["Sex_Female", "Sex_Male"]);
        let input = raw(json!({"Sex": "Female", "State": "Atlantis"}));
        assert!(assemble_one_hot(&input, &spec, &groups()).is_err());
    }
}
