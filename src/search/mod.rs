//! Debounced location search.
//!
//! Every call to [`LocationSearch::search`] takes a ticket from a shared
//! generation counter. After the debounce delay, and again after the provider
//! answers, the search checks whether a newer ticket has been issued; if so its
//! result is discarded and [`SearchOutcome::Superseded`] is returned. Only the
//! latest settled query ever reaches the caller.
//!
//! Provider failures never escape: they are logged, counted, and resolved to
//! an empty result list.

use crate::cache::SearchCache;
use crate::client::Geocoder;
use crate::geocoding::{normalize, AddressFragment, Coordinates, ProviderResult};
use crate::metrics::Metrics;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A normalized search hit ready to populate a draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCandidate {
    /// Provider display string, shown as the preview
    pub full_address: String,

    pub fragment: AddressFragment,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl From<&ProviderResult> for LocationCandidate {
    fn from(result: &ProviderResult) -> Self {
        let fragment = normalize(result);
        Self {
            full_address: fragment.full_address.clone(),
            fragment,
            coordinates: result.coordinates,
        }
    }
}

/// Result of a debounced search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The latest query settled with these candidates (possibly none)
    Results(Vec<LocationCandidate>),

    /// A newer query was issued before this one settled
    Superseded,
}

impl SearchOutcome {
    /// Candidates, or `None` when superseded.
    pub fn into_results(self) -> Option<Vec<LocationCandidate>> {
        match self {
            SearchOutcome::Results(results) => Some(results),
            SearchOutcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, SearchOutcome::Superseded)
    }
}

/// Debounced, latest-wins search over a [`Geocoder`].
#[derive(Clone)]
pub struct LocationSearch {
    geocoder: Arc<dyn Geocoder>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    cache: SearchCache<Arc<Vec<LocationCandidate>>>,
    metrics: Metrics,
}

impl LocationSearch {
    pub fn new(geocoder: Arc<dyn Geocoder>, debounce: Duration, cache_ttl: Duration) -> Self {
        Self {
            geocoder,
            debounce,
            generation: Arc::new(AtomicU64::new(0)),
            cache: SearchCache::new(cache_ttl),
            metrics: Metrics::new(),
        }
    }

    /// Share an existing metrics collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run a debounced search for `query`.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let ticket = self.next_ticket();
        self.search_as(ticket, query).await
    }

    /// Issue a ticket, superseding every search started with an older one.
    pub fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while no newer ticket has been issued.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Run a debounced search under a ticket from [`LocationSearch::next_ticket`].
    pub async fn search_as(&self, ticket: u64, query: &str) -> SearchOutcome {
        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }
        if self.is_stale(ticket) {
            tracing::debug!(query = %query, "Search superseded during debounce");
            return self.superseded();
        }

        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Results(Vec::new());
        }

        if let Some(cached) = self.cache.get(query) {
            self.metrics.record_cache_access(true);
            tracing::debug!(query = %query, "Search cache hit");
            return SearchOutcome::Results(cached.as_ref().clone());
        }
        self.metrics.record_cache_access(false);

        let response = self.geocoder.search(query).await;

        // Whatever came back, a newer query owns the result now.
        if self.is_stale(ticket) {
            tracing::debug!(query = %query, "Discarding stale search response");
            return self.superseded();
        }

        match response {
            Ok(results) => {
                let candidates: Vec<LocationCandidate> =
                    results.iter().map(LocationCandidate::from).collect();
                tracing::info!(query = %query, count = candidates.len(), "Location search settled");
                self.cache.insert(query, Arc::new(candidates.clone()));
                SearchOutcome::Results(candidates)
            }
            Err(e) => {
                tracing::warn!(query = %query, "Geocoding provider unavailable: {}", e);
                self.metrics.record_degraded();
                SearchOutcome::Results(Vec::new())
            }
        }
    }

    /// Reverse-geocode a point. Not debounced; failures yield an empty list.
    pub async fn reverse(&self, coordinates: Coordinates) -> Vec<LocationCandidate> {
        match self.geocoder.reverse(coordinates).await {
            Ok(results) => results.iter().map(LocationCandidate::from).collect(),
            Err(e) => {
                tracing::warn!(
                    lat = coordinates.lat,
                    lon = coordinates.lon,
                    "Reverse geocoding unavailable: {}",
                    e
                );
                self.metrics.record_degraded();
                Vec::new()
            }
        }
    }

    fn is_stale(&self, ticket: u64) -> bool {
        !self.is_current(ticket)
    }

    fn superseded(&self) -> SearchOutcome {
        self.metrics.record_superseded();
        SearchOutcome::Superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::ComponentKind;

    #[test]
    fn test_candidate_from_provider_result() {
        let result = ProviderResult::new("Fort, Mumbai 400001 India")
            .with_component(ComponentKind::Locality, "Mumbai")
            .with_coordinates(Coordinates::new(18.93, 72.83));

        let candidate = LocationCandidate::from(&result);
        assert_eq!(candidate.full_address, "Fort, Mumbai 400001 India");
        assert_eq!(candidate.fragment.postal_code, "400001");
        assert_eq!(candidate.fragment.city, "Mumbai");
        assert_eq!(candidate.coordinates, Some(Coordinates::new(18.93, 72.83)));
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(SearchOutcome::Superseded.is_superseded());
        assert_eq!(SearchOutcome::Superseded.into_results(), None);
        assert_eq!(
            SearchOutcome::Results(Vec::new()).into_results(),
            Some(Vec::new())
        );
    }
}
