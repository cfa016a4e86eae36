//! End-to-end pipeline test: simulated market fan-out, route advice,
//! restriction analysis, and arbitration wired together the way an
//! embedding application would run them.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use freightwise_core::{
    AlertCategory, AnalysisCache, CargoDetails, CargoType, MetricsRecorder, PricingConfig,
    QuoteRequest, RequestedRoute, RouteAdvisor, ServicePreferences,
};
use freightwise_engine::{
    ArbitrationEngine, ReasoningClient, RestrictionAnalyzer, ServiceHealth,
};
use freightwise_sources::{market_profiles, OfferSource, SimulatedSource, SourceQueryCoordinator};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Reasoning double that answers the restrictions prompt with toll chatter
/// and the arbitration prompt with a fully labeled decision.
struct StubReasoning;

#[async_trait]
impl ReasoningClient for StubReasoning {
    async fn analyze(&self, prompt: &str, _session_id: &str) -> Result<String> {
        if prompt.contains("Check specifically for") {
            Ok("Vignette required on the French autoroutes; tolls apply.".to_string())
        } else {
            Ok("RECOMMENDED_SOURCE: timocom\n\
                MARGIN_PCT: 18%\n\
                CONFIDENCE_PCT: 90%\n\
                SERVICE_LEVEL: Premium\n\
                RESTRICTIONS_IMPACT: Low\n\
                JUSTIFICATION: Deep carrier pool on the Madrid-Paris corridor."
                .to_string())
        }
    }

    async fn health(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth { status: "healthy".to_string(), model: Some("stub".to_string()) })
    }
}

fn forestry_request() -> QuoteRequest {
    QuoteRequest {
        route: RequestedRoute {
            origin: "Madrid".to_string(),
            destination: "Paris".to_string(),
        },
        cargo: CargoDetails {
            cargo_type: CargoType::Forestry,
            weight_kg: 18_000.0,
            volume_m3: Some(60.0),
            hazardous: false,
        },
        service: ServicePreferences::default(),
        client_reference: Some("LUC-2024-0042".to_string()),
    }
}

#[tokio::test]
async fn full_pipeline_produces_a_priced_recommendation() {
    init_tracing();

    let sources: Vec<Arc<dyn OfferSource>> = market_profiles()
        .into_iter()
        .map(|profile| {
            Arc::new(SimulatedSource::new(profile, Duration::from_secs(5)).without_latency())
                as Arc<dyn OfferSource>
        })
        .collect();
    let coordinator = SourceQueryCoordinator::new(sources);

    let request = forestry_request();
    let offers = coordinator.collect_offers(&request).await.unwrap();
    assert_eq!(offers.len(), 4);
    assert!(offers.iter().all(|offer| offer.price > 0.0));

    let route = RouteAdvisor::new().advise(&request.route.origin, &request.route.destination);
    assert_eq!(route.distance_km, 1270);

    let reasoning: Arc<dyn ReasoningClient> = Arc::new(StubReasoning);
    let restrictions = RestrictionAnalyzer::new(reasoning.clone())
        .analyze(&route, request.service.pickup_date, &request.cargo)
        .await;
    assert_eq!(restrictions.len(), 1);
    assert_eq!(restrictions[0].category, AlertCategory::Tolls);

    let metrics = Arc::new(MetricsRecorder::new());
    let engine = ArbitrationEngine::new(
        reasoning,
        Arc::new(AnalysisCache::new(16, Duration::from_secs(60))),
        metrics.clone(),
        PricingConfig::default(),
        Duration::from_secs(5),
    );

    let analysis = engine
        .produce_analysis(&request, &offers, &route, &restrictions)
        .await
        .unwrap();

    assert_eq!(analysis.recommended_source, "timocom");
    assert_eq!(analysis.suggested_margin_pct, 18);
    assert_eq!(analysis.confidence, 90);
    assert!(analysis.used_reasoning_service);
    assert_eq!(analysis.sources_analyzed, 4);
    assert!(analysis.final_price > analysis.base_price);
    assert!(analysis.alerts.iter().any(|alert| alert.category == AlertCategory::Tolls));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.successful_calls, 1);
    assert_eq!(snapshot.cache_hits, 0);
}
