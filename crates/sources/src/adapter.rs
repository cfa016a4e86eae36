use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use freightwise_core::{Offer, QuoteRequest};

/// One freight-offer backend. Adapters are pluggable; the coordinator treats
/// every implementation identically and never special-cases one adapter's
/// behavior.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Stable identifier, e.g. `timocom`.
    fn key(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Budget for one query against this source. A query still pending at
    /// this bound is treated as failed for the current request.
    fn query_timeout(&self) -> Duration;

    /// Fetch a priced offer for the request. Errors are tolerated by the
    /// coordinator: the source is simply omitted from the result set.
    async fn fetch_offer(&self, request: &QuoteRequest) -> Result<Offer>;
}
