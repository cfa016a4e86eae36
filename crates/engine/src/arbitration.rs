//! Arbitration of collected offers into a single priced recommendation.
//!
//! The engine prefers the external reasoning service and extracts its
//! decision from labeled response fields, but every request is guaranteed an
//! answer: any reasoning failure (error, timeout, unusable response text)
//! falls back to a deterministic confidence-weighted heuristic. Results are
//! cached by request/offer fingerprint.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use freightwise_core::{
    analysis_fingerprint, stats, AlertCategory, AlertSeverity, Analysis, AnalysisCache,
    ImpactLevel, MetricsRecorder, Offer, PricingConfig, QuoteRequest, RestrictionAlert,
    RouteFacts, ValidationError,
};

use crate::extract::{
    DecisionExtractor, ExtractedDecision, LabeledFieldExtractor, DEFAULT_CONFIDENCE_PCT,
    DEFAULT_SERVICE_LEVEL,
};
use crate::prompt::build_arbitration_prompt;
use crate::reasoning::ReasoningClient;

pub struct ArbitrationEngine {
    reasoning: Arc<dyn ReasoningClient>,
    extractor: Box<dyn DecisionExtractor>,
    cache: Arc<AnalysisCache>,
    metrics: Arc<MetricsRecorder>,
    pricing: PricingConfig,
    reasoning_timeout: Duration,
}

impl ArbitrationEngine {
    pub fn new(
        reasoning: Arc<dyn ReasoningClient>,
        cache: Arc<AnalysisCache>,
        metrics: Arc<MetricsRecorder>,
        pricing: PricingConfig,
        reasoning_timeout: Duration,
    ) -> Self {
        Self {
            reasoning,
            extractor: Box::new(LabeledFieldExtractor),
            cache,
            metrics,
            pricing,
            reasoning_timeout,
        }
    }

    /// Swap the extraction strategy; the default labeled-field scanner
    /// covers the standard prompt template.
    pub fn with_extractor(mut self, extractor: Box<dyn DecisionExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Arbitrate one request. Fails only on an invalid request; reasoning
    /// trouble of any kind degrades to the deterministic fallback.
    pub async fn produce_analysis(
        &self,
        request: &QuoteRequest,
        offers: &[Offer],
        route: &RouteFacts,
        restrictions: &[RestrictionAlert],
    ) -> Result<Analysis, ValidationError> {
        request.validate()?;
        let started = Instant::now();

        let fingerprint = analysis_fingerprint(request, offers);
        if let Some(cached) = self.cache.get(&fingerprint) {
            self.metrics.record_cache_hit();
            info!(
                event_name = "analysis_cache_hit",
                fingerprint = %fingerprint,
                origin = %request.route.origin,
                destination = %request.route.destination,
            );
            return Ok(cached);
        }

        let prompt = build_arbitration_prompt(request, offers, route, restrictions);
        let session_id = format!("arbitration-{}", Uuid::new_v4());

        let reasoning_outcome =
            tokio::time::timeout(self.reasoning_timeout, self.reasoning.analyze(&prompt, &session_id))
                .await;
        let reasoning_ms = started.elapsed().as_millis() as u64;

        let mut analysis = match reasoning_outcome {
            Ok(Ok(response_text)) => {
                self.metrics.record_success(reasoning_ms);
                self.compose_from_reasoning(&response_text, offers, restrictions)
            }
            Ok(Err(error)) => {
                self.metrics.record_failure(reasoning_ms);
                warn!(
                    event_name = "reasoning_failed",
                    session_id = %session_id,
                    error = %error,
                );
                self.fallback_analysis(offers, restrictions)
            }
            Err(_) => {
                self.metrics.record_failure(reasoning_ms);
                warn!(
                    event_name = "reasoning_timeout",
                    session_id = %session_id,
                    timeout_secs = self.reasoning_timeout.as_secs(),
                );
                self.fallback_analysis(offers, restrictions)
            }
        };

        analysis.sources_analyzed = offers.len();
        analysis.price_range = stats::price_range(offers);
        analysis.outliers = stats::detect_outliers(offers);
        analysis.processing_time_ms = started.elapsed().as_millis() as u64;

        self.cache.insert(fingerprint.clone(), analysis.clone());
        info!(
            event_name = "analysis_produced",
            fingerprint = %fingerprint,
            recommended_source = %analysis.recommended_source,
            final_price = analysis.final_price,
            used_reasoning_service = analysis.used_reasoning_service,
            processing_time_ms = analysis.processing_time_ms,
        );

        Ok(analysis)
    }

    /// Compose the analysis around the extracted decision, defaulting each
    /// missing field independently. A response with no usable fields at all
    /// still yields a complete analysis on the reasoning path.
    fn compose_from_reasoning(
        &self,
        response_text: &str,
        offers: &[Offer],
        restrictions: &[RestrictionAlert],
    ) -> Analysis {
        let decision = self.extractor.extract(response_text);
        let ExtractedDecision {
            recommended_source,
            base_price,
            margin_pct,
            final_price,
            confidence_pct,
            service_level,
            restrictions_impact,
            critical_alerts,
            special_recommendations,
        } = decision;

        let recommended_source =
            recommended_source.unwrap_or_else(|| recommended_from_offers(offers));
        let base_price = base_price
            .or_else(|| stats::weighted_average_price(offers))
            .unwrap_or(self.pricing.nominal_base_price);
        let suggested_margin_pct = margin_pct.unwrap_or(self.pricing.default_margin_pct);
        let final_price =
            final_price.unwrap_or_else(|| priced_with_margin(base_price, suggested_margin_pct));
        let service_level =
            service_level.unwrap_or_else(|| DEFAULT_SERVICE_LEVEL.to_string());

        let mut alerts = restrictions.to_vec();
        alerts.extend(critical_alerts);

        Analysis {
            recommended_source,
            base_price,
            suggested_margin_pct,
            final_price,
            confidence: confidence_pct.unwrap_or(DEFAULT_CONFIDENCE_PCT),
            service_level,
            restrictions_impact: restrictions_impact.unwrap_or_default(),
            alerts,
            special_recommendations,
            reasoning: response_text.to_string(),
            sources_analyzed: 0,
            price_range: None,
            outliers: Vec::new(),
            used_reasoning_service: true,
            processing_time_ms: 0,
            generated_at: Utc::now(),
        }
    }

    /// Deterministic heuristic used whenever the reasoning service cannot
    /// answer: highest-confidence source, confidence-weighted average price,
    /// configured default margin.
    fn fallback_analysis(&self, offers: &[Offer], restrictions: &[RestrictionAlert]) -> Analysis {
        let recommended_source = recommended_from_offers(offers);
        let base_price = stats::weighted_average_price(offers)
            .unwrap_or(self.pricing.nominal_base_price);
        let suggested_margin_pct = self.pricing.default_margin_pct;

        let mut alerts = restrictions.to_vec();
        alerts.push(RestrictionAlert::new(
            AlertSeverity::Low,
            AlertCategory::System,
            "Recommendation produced by the statistical fallback; the reasoning \
             service was unavailable",
        ));

        Analysis {
            recommended_source,
            base_price,
            suggested_margin_pct,
            final_price: priced_with_margin(base_price, suggested_margin_pct),
            confidence: self.pricing.fallback_confidence,
            service_level: DEFAULT_SERVICE_LEVEL.to_string(),
            restrictions_impact: ImpactLevel::default(),
            alerts,
            special_recommendations: Vec::new(),
            reasoning: format!(
                "Statistical recommendation over {} offers: highest-confidence \
                 source selected, price set to the confidence-weighted market \
                 average plus the standard margin.",
                offers.len()
            ),
            sources_analyzed: 0,
            price_range: None,
            outliers: Vec::new(),
            used_reasoning_service: false,
            processing_time_ms: 0,
            generated_at: Utc::now(),
        }
    }
}

fn recommended_from_offers(offers: &[Offer]) -> String {
    stats::highest_confidence_offer(offers)
        .map(|offer| offer.source.clone())
        .unwrap_or_else(|| "unknown".to_string())
}

fn priced_with_margin(base_price: f64, margin_pct: u8) -> f64 {
    (base_price * (1.0 + f64::from(margin_pct) / 100.0)).round()
}
