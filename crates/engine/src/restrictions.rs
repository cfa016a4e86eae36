//! Restriction analysis: ask the reasoning service about regulatory and
//! operational constraints on a route, then distill its free text into
//! structured alerts by keyword scanning.
//!
//! This path is advisory only. Any failure of the reasoning service degrades
//! to an empty alert list and never blocks the quote.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use freightwise_core::{
    AlertCategory, AlertSeverity, CargoDetails, RestrictionAlert, RouteFacts,
};

use crate::prompt::build_restrictions_prompt;
use crate::reasoning::ReasoningClient;

pub struct RestrictionAnalyzer {
    client: Arc<dyn ReasoningClient>,
}

impl RestrictionAnalyzer {
    pub fn new(client: Arc<dyn ReasoningClient>) -> Self {
        Self { client }
    }

    /// Collect restriction alerts for a route. Never fails: if the reasoning
    /// service is unreachable or errors, the result is simply empty.
    pub async fn analyze(
        &self,
        route: &RouteFacts,
        pickup_date: Option<NaiveDate>,
        cargo: &CargoDetails,
    ) -> Vec<RestrictionAlert> {
        let prompt = build_restrictions_prompt(route, pickup_date, cargo);
        let session_id = format!("restrictions-{}", Uuid::new_v4());

        match self.client.analyze(&prompt, &session_id).await {
            Ok(text) => {
                let alerts = scan_alerts(&text);
                debug!(
                    event_name = "restrictions_analyzed",
                    origin = %route.origin,
                    destination = %route.destination,
                    alert_count = alerts.len(),
                );
                alerts
            }
            Err(error) => {
                warn!(
                    event_name = "restrictions_unavailable",
                    origin = %route.origin,
                    destination = %route.destination,
                    error = %error,
                );
                Vec::new()
            }
        }
    }
}

/// Derive alerts from the response text by keyword category. Each category
/// fires at most once regardless of how often its keywords appear.
fn scan_alerts(response_text: &str) -> Vec<RestrictionAlert> {
    let lowered = response_text.to_ascii_lowercase();
    let mut alerts = Vec::new();

    if contains_any(&lowered, &["sunday", "weekend", "holiday"]) {
        alerts.push(
            RestrictionAlert::new(
                AlertSeverity::High,
                AlertCategory::WeekendBan,
                "Weekend or holiday driving ban may apply on this route",
            )
            .with_action("Check alternative departure dates"),
        );
    }

    if contains_any(&lowered, &["adr", "hazardous", "dangerous goods"]) {
        alerts.push(
            RestrictionAlert::new(
                AlertSeverity::Critical,
                AlertCategory::HazardousCargo,
                "Hazardous cargo regulations apply to this shipment",
            )
            .with_action("Verify carrier ADR certification"),
        );
    }

    if contains_any(&lowered, &["weight", "dimension"]) {
        alerts.push(
            RestrictionAlert::new(
                AlertSeverity::Medium,
                AlertCategory::WeightLimit,
                "Weight or dimension limits flagged along the route",
            )
            .with_action("Validate vehicle specification"),
        );
    }

    if contains_any(&lowered, &["vignette", "toll"]) {
        alerts.push(
            RestrictionAlert::new(
                AlertSeverity::Low,
                AlertCategory::Tolls,
                "Tolls or vignettes required on one or more road sections",
            )
            .with_action("Include toll costs in the quotation"),
        );
    }

    alerts
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use anyhow::{bail, Result};
    use async_trait::async_trait;

    use freightwise_core::{AlertCategory, AlertSeverity, CargoDetails, CargoType, RouteAdvisor};

    use crate::reasoning::{ReasoningClient, ServiceHealth};

    use super::RestrictionAnalyzer;

    struct CannedClient {
        response: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl CannedClient {
        fn replying(response: &'static str) -> Self {
            Self { response: Some(response), calls: AtomicUsize::new(0) }
        }

        fn failing() -> Self {
            Self { response: None, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl ReasoningClient for CannedClient {
        async fn analyze(&self, _prompt: &str, _session_id: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.response {
                Some(text) => Ok(text.to_string()),
                None => bail!("connection refused"),
            }
        }

        async fn health(&self) -> Result<ServiceHealth> {
            Ok(ServiceHealth { status: "healthy".to_string(), model: None })
        }
    }

    fn forestry_cargo() -> CargoDetails {
        CargoDetails {
            cargo_type: CargoType::Forestry,
            weight_kg: 18_000.0,
            volume_m3: None,
            hazardous: false,
        }
    }

    fn analyzer(client: CannedClient) -> (RestrictionAnalyzer, Arc<CannedClient>) {
        let client = Arc::new(client);
        (RestrictionAnalyzer::new(client.clone()), client)
    }

    #[tokio::test]
    async fn keywords_map_to_categorized_alerts() {
        let (analyzer, _) = analyzer(CannedClient::replying(
            "Sunday driving bans apply in France. ADR paperwork is mandatory \
             and an Austrian vignette must be purchased.",
        ));
        let route = RouteAdvisor::new().advise("Madrid", "Paris");

        let alerts = analyzer.analyze(&route, None, &forestry_cargo()).await;

        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].category, AlertCategory::WeekendBan);
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert_eq!(alerts[1].category, AlertCategory::HazardousCargo);
        assert_eq!(alerts[1].severity, AlertSeverity::Critical);
        assert_eq!(alerts[2].category, AlertCategory::Tolls);
        assert!(alerts.iter().all(|alert| alert.recommended_action.is_some()));
    }

    #[tokio::test]
    async fn each_category_fires_at_most_once() {
        let (analyzer, _) = analyzer(CannedClient::replying(
            "Toll sections: three. Vignette needed. More tolls near Milan.",
        ));
        let route = RouteAdvisor::new().advise("Barcelona", "Milan");

        let alerts = analyzer.analyze(&route, None, &forestry_cargo()).await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, AlertCategory::Tolls);
    }

    #[tokio::test]
    async fn service_failure_degrades_to_no_alerts() {
        let (analyzer, client) = analyzer(CannedClient::failing());
        let route = RouteAdvisor::new().advise("Madrid", "Paris");

        let alerts = analyzer.analyze(&route, None, &forestry_cargo()).await;

        assert!(alerts.is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn uneventful_response_yields_no_alerts() {
        let (analyzer, _) = analyzer(CannedClient::replying(
            "No notable restrictions on this corridor.",
        ));
        let route = RouteAdvisor::new().advise("Madrid", "Valencia");

        let alerts = analyzer.analyze(&route, None, &forestry_cargo()).await;
        assert!(alerts.is_empty());
    }
}
