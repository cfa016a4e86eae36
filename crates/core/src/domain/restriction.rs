use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Categories of operational and regulatory restrictions the analyzer knows
/// how to detect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    WeekendBan,
    HazardousCargo,
    WeightLimit,
    Tolls,
    /// Alerts emitted by the engine itself, e.g. the fallback-path notice.
    System,
}

/// One operational or regulatory alert attached to a quote analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RestrictionAlert {
    pub severity: AlertSeverity,
    pub category: AlertCategory,
    pub message: String,
    pub recommended_action: Option<String>,
}

impl RestrictionAlert {
    pub fn new(
        severity: AlertSeverity,
        category: AlertCategory,
        message: impl Into<String>,
    ) -> Self {
        Self { severity, category, message: message.into(), recommended_action: None }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.recommended_action = Some(action.into());
        self
    }
}
