//! Dashboard Module - interactive single-record scoring
//!
//! The dashboard validates a form against its schema, one-hot expands the
//! choice widgets into the dashboard column layout, scores with the dashboard
//! model and appends the outcome to the caller's session.

pub mod schema;
pub mod regional;

use serde::Serialize;

use crate::error::ScoringResult;
use crate::features::{assemble_one_hot, ColumnSpec, OneHotGroup, RawInput};
use crate::model::{LoadedModel, RiskModel};
use crate::scoring::{self, ScoreOutput};
use crate::session::{DashboardSession, SessionEntry};

pub use schema::{FormSchema, Widget, WidgetKind};
pub use regional::{
    state_risk, MonthlyRisk, RiskShare, StateRisk, ZoneRisk, NIGERIAN_STATES, RISK_DISTRIBUTION,
    RISK_TRENDS, ZONES,
};

/// Bars shown in the importance chart
pub const TOP_FEATURES: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f32,
}

pub struct Dashboard {
    schema: FormSchema,
    columns: ColumnSpec,
    groups: Vec<OneHotGroup>,
}

impl Dashboard {
    pub fn new(schema: FormSchema, columns: ColumnSpec) -> Self {
        let groups = schema.one_hot_groups();

        let expected = schema.column_spec().map(|spec| spec.names().to_vec()).unwrap_or_default();
        let unknown: Vec<&str> = expected
            .iter()
            .map(String::as_str)
            .filter(|c| !columns.contains(c))
            .collect();
        if !unknown.is_empty() {
            log::warn!(
                "{} form column(s) not in the dashboard layout and will be dropped: {:?}",
                unknown.len(),
                unknown
            );
        }

        Self { schema, columns, groups }
    }

    /// Standard form, with the layout derived from it
    pub fn standard() -> ScoringResult<Self> {
        let schema = FormSchema::standard();
        let columns = schema.column_spec()?;
        Ok(Self::new(schema, columns))
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    /// Columns written by CSV export after the fixed ones
    pub fn export_fields(&self) -> Vec<&str> {
        self.schema.field_names()
    }

    /// Score one form submission and record it in `session`.
    /// Nothing is recorded when validation or the model fails.
    pub fn predict(
        &self,
        session: &mut DashboardSession,
        raw: &RawInput,
        model: &LoadedModel,
    ) -> ScoringResult<SessionEntry> {
        let input = self.schema.normalize(raw)?;
        let vector = assemble_one_hot(&input, &self.columns, &self.groups)?;
        let result = scoring::score(
            &vector,
            model.model.as_ref(),
            &model.name,
            ScoreOutput::Probability,
        )?;

        let entry = session.log.append(&result, input).clone();
        log::debug!(
            "Session {} prediction #{}: {:.4} ({})",
            session.id,
            entry.seq,
            entry.risk_score,
            entry.tier
        );
        Ok(entry)
    }

    /// Highest `top_n` importances paired with column names, descending.
    /// Empty when the model exposes none.
    pub fn feature_importance(
        &self,
        model: &dyn RiskModel,
        top_n: usize,
    ) -> Vec<FeatureImportance> {
        let Some(importances) = model.feature_importances() else {
            return Vec::new();
        };
        if importances.len() != self.columns.len() {
            log::warn!(
                "Model reports {} importances for {} dashboard columns",
                importances.len(),
                self.columns.len()
            );
        }

        let mut ranked: Vec<FeatureImportance> = self
            .columns
            .iter()
            .zip(importances)
            .map(|(feature, importance)| FeatureImportance {
                feature: feature.to_string(),
                importance,
            })
            .collect();
        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        ranked.truncate(top_n);
        ranked
    }
}

// ============================================================================
// TESTS
// ============================================================================
