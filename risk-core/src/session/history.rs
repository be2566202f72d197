//! Session History - append-only prediction log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::RawInput;
use crate::scoring::{PredictionResult, RiskTier};

/// One past prediction and the input that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Position in the session, starting at 0
    pub seq: usize,
    pub timestamp: DateTime<Utc>,
    pub risk_score: f32,
    pub model: String,
    pub tier: RiskTier,
    pub recommendation: String,
    pub input: RawInput,
}

/// Ordered history. Entries can be appended and read, never changed.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    entries: Vec<SessionEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, result: &PredictionResult, input: RawInput) -> &SessionEntry {
        let entry = SessionEntry {
            seq: self.entries.len(),
            timestamp: Utc::now(),
            risk_score: result.risk_score,
            model: result.model.clone(),
            tier: result.tier,
            recommendation: result.recommendation.clone(),
            input,
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, seq: usize) -> Option<&SessionEntry> {
        self.entries.get(seq)
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionEntry> {
        self.entries.iter()
    }
}
