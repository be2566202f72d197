//! Form Schema - dashboard input widgets
//!
//! Every widget has a fixed valid range or option set and a default used when
//! the form leaves it out. Choice widgets become one-hot groups.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::{ConfigError, ScoringError, ScoringResult};
use crate::features::{ColumnSpec, OneHotGroup, RawInput};
use super::regional::NIGERIAN_STATES;

/// Sources a household's bed net can come from
pub const NET_SOURCES: &[&str] = &["Government", "NGO", "Purchased", "Other", "None"];

pub const SEX_OPTIONS: &[&str] = &["Female", "Male"];

// ============================================================================
// WIDGETS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetKind {
    Numeric {
        min: f64,
        max: f64,
        step: f64,
        integer: bool,
        default: f64,
    },
    Choice {
        options: Vec<String>,
        default: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: WidgetKind,
}

impl Widget {
    pub fn integer(name: &str, label: &str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: WidgetKind::Numeric { min, max, step: 1.0, integer: true, default },
        }
    }

    pub fn decimal(name: &str, label: &str, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: WidgetKind::Numeric { min, max, step, integer: false, default },
        }
    }

    pub fn choice(name: &str, label: &str, options: &[&str], default: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: WidgetKind::Choice {
                options: options.iter().map(|s| s.to_string()).collect(),
                default: default.to_string(),
            },
        }
    }

    /// Flag widget: 0 = no, 1 = yes
    pub fn flag(name: &str, label: &str, default: f64) -> Self {
        Self::integer(name, label, 0.0, 1.0, default)
    }

    fn default_value(&self) -> Value {
        match &self.kind {
            WidgetKind::Numeric { default, .. } => number(*default),
            WidgetKind::Choice { default, .. } => Value::String(default.clone()),
        }
    }

    fn check(&self, value: &Value) -> ScoringResult<Value> {
        match &self.kind {
            WidgetKind::Numeric { min, max, integer, .. } => {
                let v = value.as_f64().ok_or_else(|| {
                    ScoringError::Validation(format!("{} must be a number", self.name))
                })?;
                if v < *min || v > *max {
                    return Err(ScoringError::Validation(format!(
                        "{} must be between {} and {}, got {}",
                        self.name, min, max, v
                    )));
                }
                if *integer && v.fract() != 0.0 {
                    return Err(ScoringError::Validation(format!(
                        "{} must be a whole number, got {}",
                        self.name, v
                    )));
                }
                Ok(value.clone())
            }
            WidgetKind::Choice { options, .. } => {
                let s = value.as_str().ok_or_else(|| {
                    ScoringError::Validation(format!("{} must be one of its options", self.name))
                })?;
                if !options.iter().any(|o| o == s) {
                    return Err(ScoringError::Validation(format!(
                        "'{}' is not a valid option for {}",
                        s, self.name
                    )));
                }
                Ok(value.clone())
            }
        }
    }
}

fn number(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

// ============================================================================
// SCHEMA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    widgets: Vec<Widget>,
}

impl FormSchema {
    pub fn new(widgets: Vec<Widget>) -> Result<Self, ConfigError> {
        for (i, widget) in widgets.iter().enumerate() {
            if widgets[..i].iter().any(|w| w.name == widget.name) {
                return Err(ConfigError::Invalid(format!("duplicate widget '{}'", widget.name)));
            }
            widget.check(&widget.default_value()).map_err(|e| {
                ConfigError::Invalid(format!("default for {} is invalid: {}", widget.name, e))
            })?;
        }
        Ok(Self { widgets })
    }

    /// The household survey form
    pub fn standard() -> Self {
        Self {
            widgets: vec![
                Widget::integer("Household_Size", "Household size", 1.0, 30.0, 5.0),
                Widget::integer("Age", "Age (years)", 0.0, 100.0, 25.0),
                Widget::choice("Sex", "Sex", SEX_OPTIONS, "Female"),
                Widget::flag("Pregnant", "Pregnant", 0.0),
                Widget::integer("Wealth_Index", "Wealth index (1 = poorest)", 1.0, 5.0, 3.0),
                Widget::flag("Bednet_Owned", "Household owns a bed net", 1.0),
                Widget::flag("Bednet_Used", "Slept under a bed net last night", 1.0),
                Widget::flag("Malaria_Tested", "Tested for malaria", 0.0),
                Widget::flag("Recent_Fever", "Fever in the last two weeks", 0.0),
                Widget::flag("AntiMalaria_Meds", "Took antimalarial medication", 0.0),
                Widget::flag("Water_Access", "Access to improved water source", 1.0),
                Widget::integer("Cluster", "Survey cluster", 1.0, 1000.0, 1.0),
                Widget::decimal("Climate_Score", "Climate suitability score", 0.0, 1.0, 0.01, 0.5),
                Widget::integer("Month", "Survey month", 1.0, 12.0, 1.0),
                Widget::choice("State", "State", NIGERIAN_STATES, "Lagos"),
                Widget::choice("Source_of_Net", "Source of net", NET_SOURCES, "Government"),
            ],
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, name: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.widgets.iter().map(|w| w.name.as_str()).collect()
    }

    pub fn one_hot_groups(&self) -> Vec<OneHotGroup> {
        self.widgets
            .iter()
            .filter_map(|w| match &w.kind {
                WidgetKind::Choice { options, .. } => {
                    Some(OneHotGroup::new(w.name.clone(), options.clone()))
                }
                WidgetKind::Numeric { .. } => None,
            })
            .collect()
    }

    /// Model columns implied by the form: numeric widgets as-is, choice
    /// widgets as their dummy columns, in widget order
    pub fn column_spec(&self) -> Result<ColumnSpec, ConfigError> {
        let mut columns = Vec::new();
        for widget in &self.widgets {
            match &widget.kind {
                WidgetKind::Numeric { .. } => columns.push(widget.name.clone()),
                WidgetKind::Choice { options, .. } => {
                    let group = OneHotGroup::new(widget.name.clone(), options.clone());
                    columns.extend(group.columns());
                }
            }
        }
        ColumnSpec::new(columns)
    }

    /// Validate a submitted form and fill omitted widgets with defaults.
    /// Keys that are not widgets are dropped.
    pub fn normalize(&self, raw: &RawInput) -> ScoringResult<RawInput> {
        let mut input = RawInput::new();
        for widget in &self.widgets {
            let value = match raw.get(&widget.name) {
                None | Some(Value::Null) => widget.default_value(),
                Some(value) => widget.check(value)?,
            };
            input.insert(widget.name.clone(), value);
        }
        Ok(input)
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawInput {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_standard_schema_is_valid() {
        let schema = FormSchema::standard();
        assert_eq!(schema.widgets().len(), 16);
        assert!(FormSchema::new(schema.widgets().to_vec()).is_ok());
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let schema = FormSchema::standard();
        let input = schema.normalize(&raw(json!({"Age": 18, "Sex": "Male"}))).unwrap();

        assert_eq!(input.len(), schema.widgets().len());
        assert_eq!(input["Age"], json!(18));
        assert_eq!(input["Sex"], json!("Male"));
        assert_eq!(input["State"], json!("Lagos"));
        assert_eq!(input["Household_Size"], json!(5.0));
    }

    #[test]
    fn test_normalize_drops_unknown_keys() {
        let schema = FormSchema::standard();
        let input = schema.normalize(&raw(json!({"favourite_colour": "blue"}))).unwrap();
        assert!(!input.contains_key("favourite_colour"));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let schema = FormSchema::standard();
        for bad in [json!({"Month": 13}), json!({"Age": -1}), json!({"Climate_Score": 1.5})] {
            let result = schema.normalize(&raw(bad));
            assert!(matches!(result, Err(ScoringError::Validation(_))));
        }
    }

    #[test]
    fn test_fractional_integer_rejected() {
        let schema = FormSchema::standard();
        assert!(schema.normalize(&raw(json!({"Household_Size": 2.5}))).is_err());
        assert!(schema.normalize(&raw(json!({"Climate_Score": 0.35}))).is_ok());
    }

    #[test]
    fn test_wrong_types_rejected() {
        let schema = FormSchema::standard();
        assert!(schema.normalize(&raw(json!({"Age": "eighteen"}))).is_err());
        assert!(schema.normalize(&raw(json!({"State": 3}))).is_err());
        assert!(schema.normalize(&raw(json!({"State": "Atlantis"}))).is_err());
    }

    #[test]
    fn test_column_spec_from_schema() {
        let spec = FormSchema::standard().column_spec().unwrap();
        // 13 numeric + 2 sex + 37 states + 5 net sources
        assert_eq!(spec.len(), 13 + 2 + 37 + 5);
        assert_eq!(spec.index_of("Household_Size"), Some(0));
        assert!(spec.contains("Sex_Female"));
        assert!(spec.contains("State_Akwa Ibom"));
        assert!(spec.contains("Source_of_Net_NGO"));
    }

    #[test]
    fn test_one_hot_groups() {
        let groups = FormSchema::standard().one_hot_groups();
        let fields: Vec<&str> = groups.iter().map(|g| g.field.as_str()).collect();
        assert_eq!(fields, vec!["Sex", "State", "Source_of_Net"]);
    }

    #[test]
    fn test_duplicate_widget_rejected() {
        let widgets = vec![
            Widget::flag("Pregnant", "Pregnant", 0.0),
            Widget::flag("Pregnant", "Pregnant again", 0.0),
        ];
        assert!(FormSchema::new(widgets).is_err());
    }
}
