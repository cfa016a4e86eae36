//! Core domain model and deterministic building blocks of the quote
//! intelligence engine: request/offer/route/analysis types, corridor
//! knowledge, price statistics, fingerprinting, the analysis cache, and call
//! metrics. Everything async or network-facing lives in the `sources` and
//! `engine` crates.

pub mod cache;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fingerprint;
pub mod logging;
pub mod metrics;
pub mod routing;
pub mod stats;

pub use cache::AnalysisCache;
pub use config::{
    CacheConfig, ConfigError, EngineConfig, LoadOptions, LogFormat, LoggingConfig,
    PricingConfig, ReasoningConfig, SourceMode, SourcesConfig,
};
pub use domain::analysis::{
    Analysis, ImpactLevel, OutlierDirection, OutlierRisk, PriceOutlier, PriceRange,
};
pub use domain::offer::{Offer, OfferMetadata};
pub use domain::request::{
    CargoDetails, CargoType, QuoteRequest, RequestedRoute, ServicePreferences,
};
pub use domain::restriction::{AlertCategory, AlertSeverity, RestrictionAlert};
pub use domain::route::{RiskFactor, RiskKind, RouteComplexity, RouteFacts};
pub use errors::ValidationError;
pub use fingerprint::analysis_fingerprint;
pub use logging::init_logging;
pub use metrics::{MetricsRecorder, MetricsSnapshot};
pub use routing::RouteAdvisor;
