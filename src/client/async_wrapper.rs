//! Async wrapper around the synchronous GeocodingClient.
//!
//! This module provides an async interface to the synchronous client by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::GeocodingClient;
use crate::error::{GeocodeError, GeocodeResult};
use crate::geocoding::{Coordinates, ProviderResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Async geocoding operations.
///
/// Implementations must return results already mapped into the canonical
/// [`ProviderResult`] shape, ordered by relevance.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Search by free text.
    async fn search(&self, text: &str) -> GeocodeResult<Vec<ProviderResult>>;

    /// Reverse-geocode a coordinate.
    async fn reverse(&self, coordinates: Coordinates) -> GeocodeResult<Vec<ProviderResult>>;
}

/// Async wrapper around the synchronous GeocodingClient.
#[derive(Clone)]
pub struct AsyncGeocodingClient {
    client: Arc<GeocodingClient>,
}

impl AsyncGeocodingClient {
    pub fn new(client: GeocodingClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl Geocoder for AsyncGeocodingClient {
    async fn search(&self, text: &str) -> GeocodeResult<Vec<ProviderResult>> {
        let client = self.client.clone();
        let text = text.to_string();

        tokio::task::spawn_blocking(move || client.search(&text))
            .await
            .map_err(|e| GeocodeError::HttpError(format!("Task join error: {}", e)))?
    }

    async fn reverse(&self, coordinates: Coordinates) -> GeocodeResult<Vec<ProviderResult>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.reverse(coordinates))
            .await
            .map_err(|e| GeocodeError::HttpError(format!("Task join error: {}", e)))?
    }
}
