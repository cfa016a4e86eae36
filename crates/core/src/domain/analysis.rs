use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::restriction::RestrictionAlert;

/// Terminal artifact of the quote intelligence core: a single priced
/// recommendation arbitrated from the collected offers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Identifier of the recommended source, or `unknown` when no offer was
    /// available to recommend.
    pub recommended_source: String,
    pub base_price: f64,
    pub suggested_margin_pct: u8,
    pub final_price: f64,
    /// Decision confidence in 0..=100.
    pub confidence: u8,
    pub service_level: String,
    pub restrictions_impact: ImpactLevel,
    pub alerts: Vec<RestrictionAlert>,
    pub special_recommendations: Vec<String>,
    /// Full free-text justification from the reasoning service, or the
    /// canned fallback explanation.
    pub reasoning: String,
    pub sources_analyzed: usize,
    pub price_range: Option<PriceRange>,
    pub outliers: Vec<PriceOutlier>,
    /// False whenever the deterministic fallback heuristic produced this
    /// analysis instead of the reasoning service.
    pub used_reasoning_service: bool,
    pub processing_time_ms: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// An offer whose price deviates from the median of all offers beyond the
/// flagging threshold. Informational only; never changes the recommendation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceOutlier {
    pub source: String,
    pub price: f64,
    /// Relative deviation from the median, rounded to whole percent.
    pub deviation_pct: u32,
    pub direction: OutlierDirection,
    pub risk: OutlierRisk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierDirection {
    High,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierRisk {
    Medium,
    High,
}
