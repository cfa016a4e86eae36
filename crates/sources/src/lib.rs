//! Offer-source fan-out: pluggable adapters for freight platforms and the
//! coordinator that queries them all concurrently with per-source timeouts,
//! tolerating individual failures.
//!
//! A live platform client and the bundled market simulation implement the
//! same [`OfferSource`] trait, so the coordinator's contract never changes
//! when a backend is swapped in.

pub mod adapter;
pub mod coordinator;
pub mod simulated;

pub use adapter::OfferSource;
pub use coordinator::SourceQueryCoordinator;
pub use simulated::{market_profiles, SimulatedSource, SourceProfile};
