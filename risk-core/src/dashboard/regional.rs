//! Regional risk sample data
//!
//! Static figures for the dashboard overview chart. Not computed from
//! predictions.

use serde::Serialize;

pub const NIGERIAN_STATES: &[&str] = &[
    "Abia", "Adamawa", "Akwa Ibom", "Anambra", "Bauchi", "Bayelsa", "Benue", "Borno",
    "Cross River", "Delta", "Ebonyi", "Edo", "Ekiti", "Enugu", "FCT", "Gombe", "Imo",
    "Jigawa", "Kaduna", "Kano", "Katsina", "Kebbi", "Kogi", "Kwara", "Lagos", "Nasarawa",
    "Niger", "Ogun", "Ondo", "Osun", "Oyo", "Plateau", "Rivers", "Sokoto", "Taraba",
    "Yobe", "Zamfara",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRisk {
    pub zone: &'static str,
    pub avg_risk: f32,
    pub population: u32,
    #[serde(skip)]
    pub states: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRisk {
    pub state: &'static str,
    pub zone: &'static str,
    pub avg_risk: f32,
}

pub const ZONES: &[ZoneRisk] = &[
    ZoneRisk {
        zone: "South-South",
        avg_risk: 0.78,
        population: 45_000,
        states: &["Akwa Ibom", "Bayelsa", "Cross River", "Delta", "Edo", "Rivers"],
    },
    ZoneRisk {
        zone: "South-East",
        avg_risk: 0.65,
        population: 38_000,
        states: &["Abia", "Anambra", "Ebonyi", "Enugu", "Imo"],
    },
    ZoneRisk {
        zone: "South-West",
        avg_risk: 0.58,
        population: 52_000,
        states: &["Ekiti", "Lagos", "Ogun", "Ondo", "Osun", "Oyo"],
    },
    ZoneRisk {
        zone: "North-East",
        avg_risk: 0.72,
        population: 42_000,
        states: &["Adamawa", "Bauchi", "Borno", "Gombe", "Taraba", "Yobe"],
    },
    ZoneRisk {
        zone: "North-West",
        avg_risk: 0.68,
        population: 48_000,
        states: &["Jigawa", "Kaduna", "Kano", "Katsina", "Kebbi", "Sokoto", "Zamfara"],
    },
    ZoneRisk {
        zone: "North-Central",
        avg_risk: 0.62,
        population: 35_000,
        states: &["Benue", "FCT", "Kogi", "Kwara", "Nasarawa", "Niger", "Plateau"],
    },
];

pub fn zone_of(state: &str) -> Option<&'static ZoneRisk> {
    ZONES.iter().find(|z| z.states.contains(&state))
}

/// One row per state, in `NIGERIAN_STATES` order
pub fn state_risk() -> Vec<StateRisk> {
    NIGERIAN_STATES
        .iter()
        .filter_map(|state| {
            zone_of(state).map(|zone| StateRisk {
                state,
                zone: zone.zone,
                avg_risk: zone.avg_risk,
            })
        })
        .collect()
}

/// Average risk for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyRisk {
    pub month: &'static str,
    pub risk: f32,
}

/// Share of assessments in one risk band, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskShare {
    pub category: &'static str,
    pub value: u32,
    pub color: &'static str,
}

/// Seasonal curve peaking with the July rains
pub const RISK_TRENDS: &[MonthlyRisk] = &[
    MonthlyRisk { month: "Jan", risk: 0.45 },
    MonthlyRisk { month: "Feb", risk: 0.48 },
    MonthlyRisk { month: "Mar", risk: 0.52 },
    MonthlyRisk { month: "Apr", risk: 0.58 },
    MonthlyRisk { month: "May", risk: 0.65 },
    MonthlyRisk { month: "Jun", risk: 0.72 },
    MonthlyRisk { month: "Jul", risk: 0.78 },
    MonthlyRisk { month: "Aug", risk: 0.75 },
    MonthlyRisk { month: "Sep", risk: 0.68 },
    MonthlyRisk { month: "Oct", risk: 0.60 },
    MonthlyRisk { month: "Nov", risk: 0.52 },
    MonthlyRisk { month: "Dec", risk: 0.48 },
];

pub const RISK_DISTRIBUTION: &[RiskShare] = &[
    RiskShare { category: "Low Risk", value: 25, color: "#10b981" },
    RiskShare { category: "Medium Risk", value: 35, color: "#f59e0b" },
    RiskShare { category: "High Risk", value: 28, color: "#ef4444" },
    RiskShare { category: "Critical Risk", value: 12, color: "#7f1d1d" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_state_has_one_zone() {
        assert_eq!(NIGERIAN_STATES.len(), 37);
        for state in NIGERIAN_STATES {
            let zones = ZONES.iter().filter(|z| z.states.contains(state)).count();
            assert_eq!(zones, 1, "{} belongs to {} zones", state, zones);
        }
        let total: usize = ZONES.iter().map(|z| z.states.len()).sum();
        assert_eq!(total, NIGERIAN_STATES.len());
    }

    #[test]
    fn test_state_risk() {
        let rows = state_risk();
        assert_eq!(rows.len(), 37);
        let lagos = rows.iter().find(|r| r.state == "Lagos").unwrap();
        assert_eq!(lagos.zone, "South-West");
        assert_eq!(lagos.avg_risk, 0.58);
    }

    #[test]
    fn test_risk_trends_cover_the_year() {
        assert_eq!(RISK_TRENDS.len(), 12);
        assert_eq!(RISK_TRENDS[0].month, "Jan");
        assert_eq!(RISK_TRENDS[11].month, "Dec");

        let peak = RISK_TRENDS
            .iter()
            .max_by(|a, b| a.risk.total_cmp(&b.risk))
            .unwrap();
        assert_eq!(peak.month, "Jul");
    }

    #[test]
    fn test_risk_distribution_sums_to_100() {
        let total: u32 = RISK_DISTRIBUTION.iter().map(|s| s.value).sum();
        assert_eq!(total, 100);
    }
}
