//! Rolling call-volume and latency counters for the arbitration engine.
//!
//! Counters are per-process and never persisted. Under high concurrency the
//! running latency average is an approximation; the counters themselves only
//! ever move forward.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Injected, explicitly-constructed recorder: multiple engine instances each
/// carry their own so tests never cross-contaminate.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    inner: Mutex<Counters>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Counters {
    total_calls: u64,
    successful_calls: u64,
    failed_calls: u64,
    cache_hits: u64,
    average_response_ms: u64,
}

/// Point-in-time read-only view with derived rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_calls: u64,
    pub successful_calls: u64,
    pub failed_calls: u64,
    pub cache_hits: u64,
    pub average_response_ms: u64,
    /// Rounded percentage of successful calls over total calls.
    pub success_rate_pct: u64,
    /// Rounded percentage of cache hits over total calls.
    pub cache_hit_rate_pct: u64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, response_ms: u64) {
        let mut counters = self.inner.lock().expect("metrics lock poisoned");
        counters.successful_calls += 1;
        counters.roll_average(response_ms);
    }

    pub fn record_failure(&self, response_ms: u64) {
        let mut counters = self.inner.lock().expect("metrics lock poisoned");
        counters.failed_calls += 1;
        counters.roll_average(response_ms);
    }

    /// Cache hits bump only the hit counter; they bypass the reasoning and
    /// fallback branches entirely so they never count as success or failure.
    pub fn record_cache_hit(&self) {
        let mut counters = self.inner.lock().expect("metrics lock poisoned");
        counters.cache_hits += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = *self.inner.lock().expect("metrics lock poisoned");
        MetricsSnapshot {
            total_calls: counters.total_calls,
            successful_calls: counters.successful_calls,
            failed_calls: counters.failed_calls,
            cache_hits: counters.cache_hits,
            average_response_ms: counters.average_response_ms,
            success_rate_pct: rate_pct(counters.successful_calls, counters.total_calls),
            cache_hit_rate_pct: rate_pct(counters.cache_hits, counters.total_calls),
        }
    }

    pub fn reset(&self) {
        *self.inner.lock().expect("metrics lock poisoned") = Counters::default();
    }
}

impl Counters {
    fn roll_average(&mut self, response_ms: u64) {
        self.total_calls += 1;
        let previous_total = self.average_response_ms * (self.total_calls - 1);
        self.average_response_ms = (previous_total + response_ms) / self.total_calls;
    }
}

fn rate_pct(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (part * 100 + total / 2) / total
}
