//! One-hot groups - categorical selection → dummy columns

use serde::Serialize;

use crate::error::{ScoringError, ScoringResult};

/// A categorical field expanded into `<field>_<option>` columns.
/// Exactly one column of the group is 1 for any record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneHotGroup {
    pub field: String,
    pub options: Vec<String>,
}

impl OneHotGroup {
    pub fn new(field: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            field: field.into(),
            options,
        }
    }

    pub fn column_for(&self, option: &str) -> String {
        format!("{}_{}", self.field, option)
    }

    /// All dummy columns, in option order
    pub fn columns(&self) -> Vec<String> {
        self.options.iter().map(|o| self.column_for(o)).collect()
    }

    /// Expand a selection into `(column, 0|1)` pairs for every option
    pub fn expand(&self, selected: &str) -> ScoringResult<Vec<(String, f32)>> {
        if !self.options.iter().any(|o| o == selected) {
            return Err(ScoringError::Validation(format!(
                "'{}' is not a valid option for {}",
                selected, self.field
            )));
        }

        Ok(self
            .options
            .iter()
            .map(|o| (self.column_for(o), if o == selected { 1.0 } else { 0.0 }))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sex() -> OneHotGroup {
        OneHotGroup::new("Sex", vec!["Female".to_string(), "Male".to_string()])
    }

    #[test]
    fn test_expand_sets_exactly_one() {
        let expanded = sex().expand("Female").unwrap();
        assert_eq!(
            expanded,
            vec![("Sex_Female".to_string(), 1.0), ("Sex_Male".to_string(), 0.0)]
        );
        let sum: f32 = expanded.iter().map(|(_, v)| v).sum();
        assert_eq!(sum, 1.0);
    }

    #[test]
    fn test_unknown_option_rejected() {
        assert!(matches!(sex().expand("Other"), Err(ScoringError::Validation(_))));
    }

    #[test]
    fn test_columns_with_spaces() {
        let group = OneHotGroup::new("State", vec!["Akwa Ibom".to_string()]);
        assert_eq!(group.columns(), vec!["State_Akwa Ibom".to_string()]);
    }
}
