//! HTTP client for geocoding providers.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client builds provider-specific requests,
//! maps transport failures onto [`GeocodeError`], and hands response bodies to the
//! matching adapter in [`crate::geocoding`].

mod async_wrapper;
pub use async_wrapper::{AsyncGeocodingClient, Geocoder};

use crate::config::Config;
use crate::error::{GeocodeError, GeocodeResult};
use crate::geocoding::{google, nominatim, Coordinates, ProviderKind, ProviderResult};
use crate::metrics::{HttpTimer, Metrics};
use std::sync::Arc;
use std::time::Duration;

/// Synchronous client for the configured geocoding provider.
///
/// This client uses `ureq` and can be called from async contexts using
/// `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct GeocodingClient {
    provider: ProviderKind,

    /// Base URL for the provider API
    base_url: String,

    /// Google API key; unused for Nominatim
    api_key: Option<String>,

    country_codes: String,

    user_agent: String,

    /// Results are truncated to this many entries
    max_results: usize,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl GeocodingClient {
    /// Create a new GeocodingClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            provider: config.provider,
            base_url: config.geocoder_base_url.clone(),
            api_key: config.geocoder_api_key.clone(),
            country_codes: config.country_codes.clone(),
            user_agent: config.user_agent.clone(),
            max_results: config.max_search_results,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a client for `provider` with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(provider: ProviderKind, base_url: String, api_key: Option<String>) -> Self {
        let config = Config {
            provider,
            geocoder_base_url: base_url,
            geocoder_api_key: api_key,
            ..Config::default()
        };
        Self::new(&config)
    }

    /// Share an existing metrics collector instead of the client's own.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Build a full URL from a path and already-encoded query pairs.
    fn build_url(&self, path: &str, query: &[(&str, String)]) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let query = query
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/{}?{}", base, path, query)
    }

    /// Execute a GET request and return the body text.
    fn get(&self, path: &str, query: &[(&str, String)]) -> GeocodeResult<String> {
        let url = self.build_url(path, query);
        tracing::debug!(provider = %self.provider, "GET {}", redact_key(&url));

        let timer = HttpTimer::new(self.metrics.clone());
        let result = self
            .agent
            .get(&url)
            .set("User-Agent", &self.user_agent)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| self.map_error(e))
            .and_then(|response| {
                response
                    .into_string()
                    .map_err(|e| GeocodeError::HttpError(e.to_string()))
            });

        match &result {
            Ok(_) => timer.complete(),
            Err(e) => {
                tracing::warn!(provider = %self.provider, "Geocoding request failed: {}", e);
                timer.complete_with_error();
            }
        }

        result
    }

    /// Map a ureq error to a GeocodeError.
    fn map_error(&self, error: ureq::Error) -> GeocodeError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 | 403 => GeocodeError::Unauthorized,
                    429 => GeocodeError::RateLimitExceeded,
                    _ => GeocodeError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    GeocodeError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    GeocodeError::Timeout
                } else {
                    GeocodeError::HttpError(transport.to_string())
                }
            }
        }
    }

    fn require_api_key(&self) -> GeocodeResult<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GeocodeError::Unauthorized)
    }

    /// Country restriction in Google's `components` syntax, e.g. `country:IN`.
    fn google_components(&self) -> Option<String> {
        let components = self
            .country_codes
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| format!("country:{}", code.to_uppercase()))
            .collect::<Vec<_>>()
            .join("|");
        (!components.is_empty()).then_some(components)
    }

    fn truncate(&self, mut results: Vec<ProviderResult>) -> Vec<ProviderResult> {
        results.truncate(self.max_results);
        self.metrics.record_results_returned(results.len());
        results
    }

    // ========================= Provider Operations =========================

    /// Search for places matching free text, ordered by provider relevance.
    ///
    /// Blank text returns an empty list without a request.
    pub fn search(&self, text: &str) -> GeocodeResult<Vec<ProviderResult>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let results = match self.provider {
            ProviderKind::Nominatim => {
                let mut query = vec![
                    ("format", "jsonv2".to_string()),
                    ("q", text.to_string()),
                    ("addressdetails", "1".to_string()),
                    ("limit", self.max_results.to_string()),
                ];
                if !self.country_codes.trim().is_empty() {
                    query.push(("countrycodes", self.country_codes.clone()));
                }
                let body = self.get("/search", &query)?;
                nominatim::parse_search_response(&body)?
            }
            ProviderKind::Google => {
                let mut query = vec![("address", text.to_string())];
                if let Some(components) = self.google_components() {
                    query.push(("components", components));
                }
                query.push(("key", self.require_api_key()?));
                let body = self.get("/geocode/json", &query)?;
                google::parse_response(&body)?
            }
        };

        Ok(self.truncate(results))
    }

    /// Resolve coordinates to the places at that point.
    pub fn reverse(&self, coordinates: Coordinates) -> GeocodeResult<Vec<ProviderResult>> {
        if !coordinates.is_valid() {
            return Err(GeocodeError::ApiError {
                status: 400,
                message: format!(
                    "Coordinates out of range: {}, {}",
                    coordinates.lat, coordinates.lon
                ),
            });
        }

        let results = match self.provider {
            ProviderKind::Nominatim => {
                let query = [
                    ("format", "jsonv2".to_string()),
                    ("lat", coordinates.lat.to_string()),
                    ("lon", coordinates.lon.to_string()),
                    ("addressdetails", "1".to_string()),
                ];
                let body = self.get("/reverse", &query)?;
                nominatim::parse_reverse_response(&body)?
            }
            ProviderKind::Google => {
                let query = [
                    (
                        "latlng",
                        format!("{},{}", coordinates.lat, coordinates.lon),
                    ),
                    ("key", self.require_api_key()?),
                ];
                let body = self.get("/geocode/json", &query)?;
                google::parse_response(&body)?
            }
        };

        Ok(self.truncate(results))
    }
}

/// Hide the API key when logging request URLs.
fn redact_key(url: &str) -> String {
    match url.find("key=") {
        Some(start) => {
            let value_start = start + "key=".len();
            let end = url[value_start..]
                .find('&')
                .map(|offset| value_start + offset)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[end..])
        }
        None => url.to_string(),
    }
}
