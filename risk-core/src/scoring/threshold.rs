//! Recommendation tiers
//!
//! Two fixed cut points split the score range into three tiers. Both
//! comparisons are strict: a score exactly on a cut point falls into the
//! lower tier.

use serde::{Deserialize, Serialize};

/// Scores above this are high risk
pub const HIGH_RISK_THRESHOLD: f32 = 0.6;

/// Scores above this (and up to `HIGH_RISK_THRESHOLD`) are moderate risk
pub const LOW_RISK_THRESHOLD: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn from_score(score: f32) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if score > LOW_RISK_THRESHOLD {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskTier::High => "High risk: urgent intervention recommended",
            RiskTier::Moderate => "Moderate risk: community education and outreach",
            RiskTier::Low => "Low risk: maintain current prevention measures",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
