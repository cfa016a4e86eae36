//! Reasoning-backed analysis layer of the quote intelligence engine.
//!
//! This crate turns collected offers into a priced recommendation. The
//! [`arbitration::ArbitrationEngine`] drives a single reasoning-service call
//! per request, extracts the decision from labeled response fields, and
//! guarantees an answer through a deterministic statistical fallback. The
//! [`restrictions::RestrictionAnalyzer`] contributes advisory regulatory
//! alerts along the way.

pub mod arbitration;
pub mod extract;
pub mod prompt;
pub mod reasoning;
pub mod restrictions;

pub use arbitration::ArbitrationEngine;
pub use extract::{DecisionExtractor, ExtractedDecision, LabeledFieldExtractor};
pub use reasoning::{HttpReasoningClient, ReasoningClient, ServiceHealth};
pub use restrictions::RestrictionAnalyzer;
