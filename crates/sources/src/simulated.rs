//! Market simulation adapters.
//!
//! Used whenever a platform has no live backend configured: prices are
//! synthesized from corridor distance, a cargo-type rate table, a fixed
//! per-source factor, and a small bounded random perturbation to emulate
//! market variance. Exists strictly as a fallback data source behind the
//! same [`OfferSource`] contract as a real client.

use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;

use freightwise_core::{
    CargoDetails, CargoType, Offer, OfferMetadata, QuoteRequest, RouteAdvisor,
};

use crate::adapter::OfferSource;

/// Weight above which per-km rates take a bulk discount.
const HEAVY_LOAD_KG: f64 = 25_000.0;
/// Weight below which per-km rates take a light-load surcharge.
const LIGHT_LOAD_KG: f64 = 5_000.0;
const HEAVY_LOAD_FACTOR: f64 = 0.95;
const LIGHT_LOAD_FACTOR: f64 = 1.15;
/// Random market variance applied to every synthesized price: ±5%.
const MARKET_VARIANCE: f64 = 0.05;

/// Static behavior profile of one simulated platform.
#[derive(Clone, Debug)]
pub struct SourceProfile {
    pub key: &'static str,
    pub name: &'static str,
    pub confidence: u8,
    /// Fixed positioning multiplier relative to the market base price.
    pub price_factor: f64,
    pub service_level: &'static str,
    pub coverage: &'static str,
    pub premium: bool,
    pub carriers: RangeInclusive<u32>,
    pub latency_ms: RangeInclusive<u64>,
}

/// The four simulated platforms, in registration order.
pub fn market_profiles() -> Vec<SourceProfile> {
    vec![
        SourceProfile {
            key: "timocom",
            name: "Timocom",
            confidence: 92,
            price_factor: 1.08,
            service_level: "Premium",
            coverage: "europe",
            premium: true,
            carriers: 15..=25,
            latency_ms: 800..=1200,
        },
        SourceProfile {
            key: "cargopedia",
            name: "Cargopedia",
            confidence: 80,
            price_factor: 0.92,
            service_level: "Standard",
            coverage: "europe",
            premium: false,
            carriers: 8..=15,
            latency_ms: 1200..=2000,
        },
        SourceProfile {
            key: "sennder",
            name: "Sennder",
            confidence: 88,
            price_factor: 0.98,
            service_level: "Express",
            coverage: "europe_premium",
            premium: true,
            carriers: 12..=20,
            latency_ms: 600..=900,
        },
        SourceProfile {
            key: "instafreight",
            name: "InstaFreight",
            confidence: 75,
            price_factor: 0.88,
            service_level: "Economy",
            coverage: "europe_startup",
            premium: false,
            carriers: 5..=10,
            latency_ms: 500..=700,
        },
    ]
}

pub struct SimulatedSource {
    profile: SourceProfile,
    advisor: RouteAdvisor,
    timeout: Duration,
    simulate_latency: bool,
}

impl SimulatedSource {
    pub fn new(profile: SourceProfile, timeout: Duration) -> Self {
        Self { profile, advisor: RouteAdvisor::new(), timeout, simulate_latency: true }
    }

    /// Skip the latency simulation; for tests that run on real time.
    pub fn without_latency(mut self) -> Self {
        self.simulate_latency = false;
        self
    }

    fn synthesize_price(&self, request: &QuoteRequest) -> f64 {
        let facts = self.advisor.advise(&request.route.origin, &request.route.destination);
        let base = f64::from(facts.distance_km) * per_km_rate(&request.cargo);

        let variance_band = 1.0 - MARKET_VARIANCE..=1.0 + MARKET_VARIANCE;
        let variance = rand::thread_rng().gen_range(variance_band);

        (base * self.profile.price_factor * variance).round()
    }

    fn estimated_days(&self, request: &QuoteRequest) -> u32 {
        self.advisor.advise(&request.route.origin, &request.route.destination).transit_days
    }
}

#[async_trait]
impl OfferSource for SimulatedSource {
    fn key(&self) -> &str {
        self.profile.key
    }

    fn display_name(&self) -> &str {
        self.profile.name
    }

    fn query_timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch_offer(&self, request: &QuoteRequest) -> Result<Offer> {
        if self.simulate_latency {
            let latency = rand::thread_rng().gen_range(self.profile.latency_ms.clone());
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        let carriers = rand::thread_rng().gen_range(self.profile.carriers.clone());

        Ok(Offer {
            source: self.profile.key.to_string(),
            source_name: self.profile.name.to_string(),
            price: self.synthesize_price(request),
            confidence: Some(self.profile.confidence),
            response_time_ms: 0, // stamped by the coordinator
            metadata: OfferMetadata {
                service_level: Some(self.profile.service_level.to_string()),
                available_carriers: Some(carriers),
                estimated_days: Some(self.estimated_days(request)),
                coverage: Some(self.profile.coverage.to_string()),
                is_premium: self.profile.premium,
                is_simulated: true,
            },
        })
    }
}

/// Per-kilometer market rate by cargo category. The hazardous flag forces
/// the ADR premium rate regardless of category.
fn per_km_rate(cargo: &CargoDetails) -> f64 {
    let mut rate = if cargo.hazardous {
        1.15
    } else {
        match cargo.cargo_type {
            CargoType::Forestry => 0.85,
            CargoType::Chemical => 1.15,
            CargoType::Refrigerated => 1.10,
            CargoType::Machinery => 1.05,
            CargoType::General => 0.95,
        }
    };

    if cargo.weight_kg > HEAVY_LOAD_KG {
        rate *= HEAVY_LOAD_FACTOR;
    } else if cargo.weight_kg < LIGHT_LOAD_KG {
        rate *= LIGHT_LOAD_FACTOR;
    }

    rate
}
