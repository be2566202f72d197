//! Categorical Encoding - string values → integer codes
//!
//! Two policies:
//! - `PerBatch`: codes are assigned per column from the distinct values seen
//!   in the current batch, in first-seen order. A single-row request always
//!   encodes every category as 0, so the codes do not line up with whatever
//!   encoding the model was trained with. Kept as the default for
//!   compatibility with existing clients; a warning is logged at startup.
//! - `Vocabulary`: codes are positions in a fixed per-column category list
//!   loaded from configuration. Unknown categories are treated as missing.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::read_json;
use crate::error::ConfigError;

// ============================================================================
// CELL VALUES
// ============================================================================

/// A single raw value after type coercion
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f32),
    Category(String),
}

impl Cell {
    /// Coerce a JSON value. `null` yields `None` (treated as missing).
    ///
    /// Numeric strings stay categorical; nested values are categorical on
    /// their JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Cell::Number(if *b { 1.0 } else { 0.0 })),
            Value::Number(n) => n.as_f64().map(|v| Cell::Number(v as f32)),
            Value::String(s) => Some(Cell::Category(s.clone())),
            other => Some(Cell::Category(other.to_string())),
        }
    }

    /// Text form used when a column is encoded as a whole
    fn label(&self) -> String {
        match self {
            Cell::Number(v) => v.to_string(),
            Cell::Category(s) => s.clone(),
        }
    }
}

/// One intermediate record: model column → coerced value
pub type Record = HashMap<String, Cell>;

/// One numeric record: model column → value
pub type NumericRecord = HashMap<String, f32>;

// ============================================================================
// POLICY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingPolicy {
    #[default]
    PerBatch,
    Vocabulary,
}

impl EncodingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingPolicy::PerBatch => "per_batch",
            EncodingPolicy::Vocabulary => "vocabulary",
        }
    }
}

impl FromStr for EncodingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_batch" | "per-batch" => Ok(EncodingPolicy::PerBatch),
            "vocabulary" => Ok(EncodingPolicy::Vocabulary),
            other => Err(ConfigError::Invalid(format!(
                "unknown categorical encoding '{}' (expected per_batch or vocabulary)",
                other
            ))),
        }
    }
}

/// Fixed category lists per model column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryVocabulary {
    columns: BTreeMap<String, Vec<String>>,
}

impl CategoryVocabulary {
    pub fn new(columns: BTreeMap<String, Vec<String>>) -> Self {
        Self { columns }
    }

    /// Load from `{ "Column": ["a", "b", ...], ... }`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let vocabulary: Self = read_json(path)?;
        log::info!(
            "Loaded category vocabulary from {} ({} columns)",
            path.display(),
            vocabulary.columns.len()
        );
        Ok(vocabulary)
    }

    pub fn code(&self, column: &str, value: &str) -> Option<usize> {
        self.columns.get(column)?.iter().position(|v| v == value)
    }
}

/// Encoding strategy handed to the assembler
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CategoricalEncoding {
    #[default]
    PerBatch,
    Vocabulary(CategoryVocabulary),
}

impl CategoricalEncoding {
    pub fn policy(&self) -> EncodingPolicy {
        match self {
            CategoricalEncoding::PerBatch => EncodingPolicy::PerBatch,
            CategoricalEncoding::Vocabulary(_) => EncodingPolicy::Vocabulary,
        }
    }

    /// Turn every record numeric. Only `columns` are considered; anything
    /// else is dropped since it never reaches the model.
    pub fn encode_batch<'a>(
        &self,
        records: &[Record],
        columns: impl Iterator<Item = &'a str>,
    ) -> Vec<NumericRecord> {
        let mut out: Vec<NumericRecord> = vec![NumericRecord::new(); records.len()];

        for column in columns {
            match self {
                CategoricalEncoding::PerBatch => encode_column_per_batch(records, column, &mut out),
                CategoricalEncoding::Vocabulary(vocab) => {
                    encode_column_vocabulary(records, column, vocab, &mut out)
                }
            }
        }

        out
    }
}

// ============================================================================
// COLUMN ENCODERS
// ============================================================================

/// A column holding any category is encoded as a whole, numbers included
fn encode_column_per_batch(records: &[Record], column: &str, out: &mut [NumericRecord]) {
    let categorical = records
        .iter()
        .any(|r| matches!(r.get(column), Some(Cell::Category(_))));

    if !categorical {
        for (record, target) in records.iter().zip(out.iter_mut()) {
            if let Some(Cell::Number(v)) = record.get(column) {
                target.insert(column.to_string(), *v);
            }
        }
        return;
    }

    let mut codes: Vec<String> = Vec::new();
    for (record, target) in records.iter().zip(out.iter_mut()) {
        let Some(cell) = record.get(column) else {
            continue;
        };
        let label = cell.label();
        let code = match codes.iter().position(|c| *c == label) {
            Some(code) => code,
            None => {
                codes.push(label);
                codes.len() - 1
            }
        };
        target.insert(column.to_string(), code as f32);
    }
}

fn encode_column_vocabulary(
    records: &[Record],
    column: &str,
    vocab: &CategoryVocabulary,
    out: &mut [NumericRecord],
) {
    for (record, target) in records.iter().zip(out.iter_mut()) {
        match record.get(column) {
            Some(Cell::Number(v)) => {
                target.insert(column.to_string(), *v);
            }
            Some(Cell::Category(value)) => match vocab.code(column, value) {
                Some(code) => {
                    target.insert(column.to_string(), code as f32);
                }
                None => {
                    log::warn!("Unknown category '{}' for column {}; filling 0", value, column);
                }
            },
            None => {}
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
