use serde::{Deserialize, Serialize};

/// A single source's priced response to a quote request.
///
/// Created by the source coordinator per successful response, never mutated,
/// and lives only for the duration of one request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Stable source identifier, e.g. `timocom`.
    pub source: String,
    /// Display name for client-facing output.
    pub source_name: String,
    /// Currency-agnostic all-inclusive amount.
    pub price: f64,
    /// Source-asserted reliability in 0..=100. Sources that do not assert one
    /// are weighted at a documented default during arbitration.
    pub confidence: Option<u8>,
    pub response_time_ms: u64,
    pub metadata: OfferMetadata,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferMetadata {
    pub service_level: Option<String>,
    pub available_carriers: Option<u32>,
    pub estimated_days: Option<u32>,
    pub coverage: Option<String>,
    pub is_premium: bool,
    /// Set when the offer came from the market simulation rather than a live
    /// platform API.
    pub is_simulated: bool,
}
