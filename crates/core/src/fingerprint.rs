//! Request fingerprinting for the analysis cache.
//!
//! The key covers the route, the cargo essentials, and the multiset of
//! (source, price) pairs: anything that would change the arbitration outcome.
//! The digest is truncated to bound key size; collisions are accepted as a
//! negligible-probability stale-hit risk, not treated as a correctness hazard.

use serde_json::json;
use sha2::{Digest, Sha256};

use crate::domain::offer::Offer;
use crate::domain::request::QuoteRequest;

/// Hex length of the truncated digest.
const FINGERPRINT_LEN: usize = 16;

/// Deterministic short digest of the inputs to one arbitration call.
pub fn analysis_fingerprint(request: &QuoteRequest, offers: &[Offer]) -> String {
    let key_material = json!({
        "route": {
            "origin": request.route.origin.trim().to_ascii_lowercase(),
            "destination": request.route.destination.trim().to_ascii_lowercase(),
        },
        "cargo": {
            "type": request.cargo.cargo_type,
            "weight_kg": request.cargo.weight_kg,
            "hazardous": request.cargo.hazardous,
        },
        "prices": offers
            .iter()
            .map(|offer| json!({ "source": offer.source, "price": offer.price }))
            .collect::<Vec<_>>(),
    });

    let digest = Sha256::digest(key_material.to_string().as_bytes());
    let mut fingerprint = String::with_capacity(FINGERPRINT_LEN);
    for byte in digest.iter().take(FINGERPRINT_LEN / 2) {
        fingerprint.push_str(&format!("{byte:02x}"));
    }
    fingerprint
}
