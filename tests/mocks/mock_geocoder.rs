use address_mcp_server::client::Geocoder;
use address_mcp_server::error::{GeocodeError, GeocodeResult};
use address_mcp_server::geocoding::{Coordinates, ProviderResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock geocoder for testing.
///
/// Answers searches from an in-memory table keyed by query text, can be told
/// to fail or to take a while to answer, and tracks method calls for
/// verification.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockGeocoder {
    places: Arc<Mutex<HashMap<String, Vec<ProviderResult>>>>,
    reverse_places: Arc<Mutex<Vec<ProviderResult>>>,
    failure: Arc<Mutex<Option<u16>>>,
    latency: Arc<Mutex<Duration>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockGeocoder {
    /// Create a new MockGeocoder that knows no places.
    pub fn new() -> Self {
        Self {
            places: Arc::new(Mutex::new(HashMap::new())),
            reverse_places: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            latency: Arc::new(Mutex::new(Duration::ZERO)),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register the results returned for a search query.
    pub fn add_places(&self, query: &str, results: Vec<ProviderResult>) {
        let mut places = self.places.lock().unwrap();
        places.insert(query.to_string(), results);
    }

    /// Register the results returned for any reverse lookup.
    pub fn set_reverse_places(&self, results: Vec<ProviderResult>) {
        *self.reverse_places.lock().unwrap() = results;
    }

    /// Make every subsequent call fail as if the provider answered `status`.
    pub fn fail_with_status(&self, status: u16) {
        *self.failure.lock().unwrap() = Some(status);
    }

    /// Let calls succeed again.
    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Delay every answer by `latency` (observable under paused tokio time).
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Queries that reached the provider, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    async fn answer(&self, results: Vec<ProviderResult>) -> GeocodeResult<Vec<ProviderResult>> {
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let failure = *self.failure.lock().unwrap();
        match failure {
            Some(status) => Err(GeocodeError::ApiError {
                status,
                message: "mock provider failure".to_string(),
            }),
            None => Ok(results),
        }
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn search(&self, text: &str) -> GeocodeResult<Vec<ProviderResult>> {
        self.track_call("search");
        self.queries.lock().unwrap().push(text.to_string());

        let results = self
            .places
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_default();
        self.answer(results).await
    }

    async fn reverse(&self, _coordinates: Coordinates) -> GeocodeResult<Vec<ProviderResult>> {
        self.track_call("reverse");

        let results = self.reverse_places.lock().unwrap().clone();
        self.answer(results).await
    }
}
