use thiserror::Error;

/// The only error class surfaced to callers of the engine.
///
/// Everything else in the quote pipeline degrades to a documented default
/// instead of propagating: source failures become omitted offers, reasoning
/// failures trigger the deterministic fallback, restriction-analysis failures
/// yield an empty alert list. A request that cannot be priced at all is the
/// one condition rejected up front.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("quote request is missing an origin city")]
    MissingOrigin,
    #[error("quote request is missing a destination city")]
    MissingDestination,
    #[error("cargo weight must be positive, got {weight_kg}kg")]
    NonPositiveWeight { weight_kg: f64 },
}
