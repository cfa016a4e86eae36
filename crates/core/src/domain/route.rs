use serde::{Deserialize, Serialize};

use crate::domain::restriction::AlertSeverity;

/// Resolved facts about an origin/destination corridor.
///
/// Either retrieved verbatim from the static corridor table or synthesized by
/// geometric estimation (`is_estimated`); when either endpoint is unknown a
/// conservative hard-coded route is returned instead (`is_fallback`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteFacts {
    pub origin: String,
    pub destination: String,
    pub distance_km: u32,
    pub duration_hours: u32,
    /// Transited jurisdictions in travel order, as ISO country codes.
    pub jurisdictions: Vec<String>,
    pub main_highways: Vec<String>,
    pub border_crossings: Vec<String>,
    pub transit_days: u32,
    pub complexity: RouteComplexity,
    pub risk_factors: Vec<RiskFactor>,
    pub is_estimated: bool,
    pub is_fallback: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteComplexity {
    Low,
    Medium,
    High,
}

impl RouteComplexity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    MultipleBorders,
    LongDistance,
    EasternCorridor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskKind,
    pub severity: AlertSeverity,
    pub description: String,
}
