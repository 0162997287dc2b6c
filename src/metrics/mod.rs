//! Basic metrics instrumentation for geocoding traffic.
//!
//! Provides counters and duration tracking for provider requests, the result
//! cache, and searches that were superseded or degraded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by the geocoding client and the location search.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of provider HTTP requests made
    http_requests_total: Arc<AtomicU64>,

    /// Total number of failed provider requests
    http_errors_total: Arc<AtomicU64>,

    /// Total duration of all provider requests in milliseconds
    http_duration_total_ms: Arc<AtomicU64>,

    /// Number of provider results returned to callers
    results_returned_total: Arc<AtomicU64>,

    cache_hits_total: Arc<AtomicU64>,

    cache_misses_total: Arc<AtomicU64>,

    /// Searches dropped because a newer query arrived
    superseded_total: Arc<AtomicU64>,

    /// Searches that fell back to an empty result after a provider failure
    degraded_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            http_requests_total: Arc::new(AtomicU64::new(0)),
            http_errors_total: Arc::new(AtomicU64::new(0)),
            http_duration_total_ms: Arc::new(AtomicU64::new(0)),
            results_returned_total: Arc::new(AtomicU64::new(0)),
            cache_hits_total: Arc::new(AtomicU64::new(0)),
            cache_misses_total: Arc::new(AtomicU64::new(0)),
            superseded_total: Arc::new(AtomicU64::new(0)),
            degraded_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a provider request with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a failed provider request.
    pub fn record_http_error(&self) {
        self.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_results_returned(&self, count: usize) {
        self.results_returned_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a cache lookup.
    pub fn record_cache_access(&self, hit: bool) {
        if hit {
            self.cache_hits_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_superseded(&self) {
        self.superseded_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_degraded(&self) {
        self.degraded_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    pub fn http_errors_total(&self) -> u64 {
        self.http_errors_total.load(Ordering::Relaxed)
    }

    pub fn http_duration_total_ms(&self) -> u64 {
        self.http_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average provider request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn results_returned_total(&self) -> u64 {
        self.results_returned_total.load(Ordering::Relaxed)
    }

    pub fn cache_hits_total(&self) -> u64 {
        self.cache_hits_total.load(Ordering::Relaxed)
    }

    pub fn cache_misses_total(&self) -> u64 {
        self.cache_misses_total.load(Ordering::Relaxed)
    }

    pub fn superseded_total(&self) -> u64 {
        self.superseded_total.load(Ordering::Relaxed)
    }

    pub fn degraded_total(&self) -> u64 {
        self.degraded_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            results_returned_total: self.results_returned_total(),
            cache_hits_total: self.cache_hits_total(),
            cache_misses_total: self.cache_misses_total(),
            superseded_total: self.superseded_total(),
            degraded_total: self.degraded_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_avg_ms: f64,
    pub results_returned_total: u64,
    pub cache_hits_total: u64,
    pub cache_misses_total: u64,
    pub superseded_total: u64,
    pub degraded_total: u64,
}

/// Helper for timing provider requests.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    /// Start timing a provider request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
        self.metrics.record_http_error();
    }
}
