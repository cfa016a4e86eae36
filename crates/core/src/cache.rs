//! Bounded, time-expiring cache from request fingerprint to a previously
//! computed analysis.
//!
//! Eviction is insertion-order FIFO: inserting beyond capacity drops the
//! oldest entry. An entry past its TTL is never returned as a hit. All access
//! goes through one internal lock; no operation spans more than a single
//! get-or-insert, so the critical sections stay short.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::domain::analysis::Analysis;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
pub struct AnalysisCache {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    insertion_order: VecDeque<String>,
}

#[derive(Debug)]
struct CacheEntry {
    analysis: Analysis,
    inserted_at: Instant,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}

impl AnalysisCache {
    /// Capacity must be non-zero; a zero capacity is clamped to one so the
    /// eviction invariant stays meaningful.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self { capacity: capacity.max(1), ttl, inner: Mutex::new(CacheInner::default()) }
    }

    /// Returns the cached analysis for `fingerprint` unless the entry has
    /// outlived the TTL. Expired entries are removed on the way out.
    pub fn get(&self, fingerprint: &str) -> Option<Analysis> {
        let mut inner = self.inner.lock().expect("analysis cache lock poisoned");

        let expired = match inner.entries.get(fingerprint) {
            Some(entry) => entry.inserted_at.elapsed() >= self.ttl,
            None => return None,
        };

        if expired {
            inner.entries.remove(fingerprint);
            inner.insertion_order.retain(|key| key != fingerprint);
            debug!(event_name = "cache.expired", fingerprint, "expired analysis entry dropped");
            return None;
        }

        inner.entries.get(fingerprint).map(|entry| entry.analysis.clone())
    }

    /// Stores `analysis` under `fingerprint`, evicting the oldest entry when
    /// the cache is full. Re-inserting an existing fingerprint refreshes the
    /// value and timestamp but keeps its original place in eviction order.
    pub fn insert(&self, fingerprint: impl Into<String>, analysis: Analysis) {
        let fingerprint = fingerprint.into();
        let mut inner = self.inner.lock().expect("analysis cache lock poisoned");

        if inner.entries.contains_key(&fingerprint) {
            inner
                .entries
                .insert(fingerprint, CacheEntry { analysis, inserted_at: Instant::now() });
            return;
        }

        if inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner.insertion_order.pop_front() {
                inner.entries.remove(&oldest);
                debug!(event_name = "cache.evicted", fingerprint = %oldest, "oldest entry evicted");
            }
        }

        inner.insertion_order.push_back(fingerprint.clone());
        inner.entries.insert(fingerprint, CacheEntry { analysis, inserted_at: Instant::now() });
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("analysis cache lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("analysis cache lock poisoned");
        inner.entries.clear();
        inner.insertion_order.clear();
    }
}
