//! Concurrent fan-out over all registered offer sources.
//!
//! Every source is queried at once, each bounded by its own timeout; the
//! coordinator waits for all of them to settle, so total wait time is bounded
//! by the slowest single timeout rather than the sum. A failed or timed-out
//! source is logged and omitted — never an overall failure. Offers come back
//! in source-registration order for deterministic downstream behavior.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{info, warn};

use freightwise_core::config::SourcesConfig;
use freightwise_core::{Offer, QuoteRequest, ValidationError};

use crate::adapter::OfferSource;
use crate::simulated::{market_profiles, SimulatedSource};

pub struct SourceQueryCoordinator {
    sources: Vec<Arc<dyn OfferSource>>,
}

impl SourceQueryCoordinator {
    pub fn new(sources: Vec<Arc<dyn OfferSource>>) -> Self {
        Self { sources }
    }

    /// Coordinator over the four simulated market platforms.
    pub fn simulated_market(config: &SourcesConfig) -> Self {
        let timeout = Duration::from_secs(config.query_timeout_secs);
        let sources = market_profiles()
            .into_iter()
            .map(|profile| {
                Arc::new(SimulatedSource::new(profile, timeout)) as Arc<dyn OfferSource>
            })
            .collect();
        Self::new(sources)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Query all sources concurrently and return the successful offers, in
    /// registration order. Fails only on a fundamentally invalid request;
    /// individual source failures are tolerated and omitted.
    pub async fn collect_offers(
        &self,
        request: &QuoteRequest,
    ) -> Result<Vec<Offer>, ValidationError> {
        request.validate()?;

        let mut handles = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let source = Arc::clone(source);
            let request = request.clone();
            handles.push(tokio::spawn(async move { query_source(source, &request).await }));
        }

        let mut offers = Vec::new();
        for handle in handles {
            // A panicked source task counts as a failed source, nothing more.
            if let Ok(Some(offer)) = handle.await {
                offers.push(offer);
            }
        }

        info!(
            event_name = "sources.fanout.settled",
            origin = %request.route.origin,
            destination = %request.route.destination,
            requested = self.sources.len(),
            received = offers.len(),
            "offer fan-out settled"
        );

        Ok(offers)
    }
}

async fn query_source(source: Arc<dyn OfferSource>, request: &QuoteRequest) -> Option<Offer> {
    let started = Instant::now();

    match timeout(source.query_timeout(), source.fetch_offer(request)).await {
        Ok(Ok(mut offer)) => {
            offer.response_time_ms = started.elapsed().as_millis() as u64;
            Some(offer)
        }
        Ok(Err(error)) => {
            warn!(
                event_name = "sources.query.failed",
                source = source.key(),
                error = %error,
                "source query failed, omitting offer"
            );
            None
        }
        Err(_) => {
            warn!(
                event_name = "sources.query.timeout",
                source = source.key(),
                timeout_ms = source.query_timeout().as_millis() as u64,
                "source query timed out, omitting offer"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use freightwise_core::config::SourcesConfig;
    use freightwise_core::{
        CargoDetails, CargoType, Offer, OfferMetadata, QuoteRequest, RequestedRoute,
        ServicePreferences, SourceMode, ValidationError,
    };

    use super::SourceQueryCoordinator;
    use crate::adapter::OfferSource;

    enum Behavior {
        Respond { price: f64, delay: Duration },
        Fail,
    }

    struct ScriptedSource {
        key: String,
        behavior: Behavior,
        timeout: Duration,
    }

    impl ScriptedSource {
        fn responding(key: &str, price: f64) -> Arc<dyn OfferSource> {
            Arc::new(Self {
                key: key.to_string(),
                behavior: Behavior::Respond { price, delay: Duration::ZERO },
                timeout: Duration::from_secs(5),
            })
        }

        fn slow(key: &str, price: f64, delay: Duration) -> Arc<dyn OfferSource> {
            Arc::new(Self {
                key: key.to_string(),
                behavior: Behavior::Respond { price, delay },
                timeout: Duration::from_secs(5),
            })
        }

        fn failing(key: &str) -> Arc<dyn OfferSource> {
            Arc::new(Self {
                key: key.to_string(),
                behavior: Behavior::Fail,
                timeout: Duration::from_secs(5),
            })
        }
    }

    #[async_trait]
    impl OfferSource for ScriptedSource {
        fn key(&self) -> &str {
            &self.key
        }

        fn display_name(&self) -> &str {
            &self.key
        }

        fn query_timeout(&self) -> Duration {
            self.timeout
        }

        async fn fetch_offer(&self, _request: &QuoteRequest) -> Result<Offer> {
            match &self.behavior {
                Behavior::Respond { price, delay } => {
                    tokio::time::sleep(*delay).await;
                    Ok(Offer {
                        source: self.key.clone(),
                        source_name: self.key.clone(),
                        price: *price,
                        confidence: Some(85),
                        response_time_ms: 0,
                        metadata: OfferMetadata::default(),
                    })
                }
                Behavior::Fail => Err(anyhow!("platform unavailable")),
            }
        }
    }

    fn request() -> QuoteRequest {
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
            client_reference: None,
        }
    }

    #[tokio::test]
    async fn failing_sources_are_omitted_not_fatal() {
        let coordinator = SourceQueryCoordinator::new(vec![
            ScriptedSource::responding("alpha", 3200.0),
            ScriptedSource::failing("beta"),
            ScriptedSource::responding("gamma", 3500.0),
        ]);

        let offers = coordinator.collect_offers(&request()).await.expect("valid request");
        let keys: Vec<_> = offers.iter().map(|offer| offer.source.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "gamma"]);
    }

    #[tokio::test]
    async fn all_sources_failing_yields_an_empty_list() {
        let coordinator = SourceQueryCoordinator::new(vec![
            ScriptedSource::failing("alpha"),
            ScriptedSource::failing("beta"),
        ]);

        let offers = coordinator.collect_offers(&request()).await.expect("valid request");
        assert!(offers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn a_source_past_its_timeout_is_treated_as_failed() {
        let coordinator = SourceQueryCoordinator::new(vec![
            ScriptedSource::responding("fast", 3100.0),
            ScriptedSource::slow("stuck", 2900.0, Duration::from_secs(30)),
        ]);

        let offers = coordinator.collect_offers(&request()).await.expect("valid request");
        let keys: Vec<_> = offers.iter().map(|offer| offer.source.as_str()).collect();
        assert_eq!(keys, vec!["fast"]);
    }

    #[tokio::test(start_paused = true)]
    async fn offers_keep_registration_order_regardless_of_arrival() {
        let coordinator = SourceQueryCoordinator::new(vec![
            ScriptedSource::slow("slowest", 2900.0, Duration::from_secs(2)),
            ScriptedSource::responding("instant", 3100.0),
            ScriptedSource::slow("middling", 3300.0, Duration::from_secs(1)),
        ]);

        let offers = coordinator.collect_offers(&request()).await.expect("valid request");
        let keys: Vec<_> = offers.iter().map(|offer| offer.source.as_str()).collect();
        assert_eq!(keys, vec!["slowest", "instant", "middling"]);
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_any_query() {
        let coordinator =
            SourceQueryCoordinator::new(vec![ScriptedSource::responding("alpha", 3200.0)]);

        let mut invalid = request();
        invalid.route.origin = String::new();

        assert_eq!(
            coordinator.collect_offers(&invalid).await,
            Err(ValidationError::MissingOrigin)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_market_returns_offers_from_every_platform() {
        let config = SourcesConfig {
            mode: SourceMode::Simulated,
            query_timeout_secs: 10,
            timocom_api_key: None,
            transeu_api_key: None,
        };
        let coordinator = SourceQueryCoordinator::simulated_market(&config);

        let offers = coordinator.collect_offers(&request()).await.expect("valid request");
        assert_eq!(offers.len(), 4);
        let keys: Vec<_> = offers.iter().map(|offer| offer.source.as_str()).collect();
        assert_eq!(keys, vec!["timocom", "cargopedia", "sennder", "instafreight"]);
        assert!(offers.iter().all(|offer| offer.price > 0.0));
    }
}
