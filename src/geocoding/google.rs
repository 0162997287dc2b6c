//! Adapter for Google Geocoding API payloads.

use super::{ComponentKind, Coordinates, ProviderResult, MAX_SUBLOCALITY_LEVEL};
use crate::error::{GeocodeError, GeocodeResult};
use serde::Deserialize;

/// Top-level `geocode/json` response.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct GeocodeResponse {
    pub results: Vec<GooglePlace>,
    pub status: String,
    pub error_message: Option<String>,
}

/// One geocoding result.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GooglePlace {
    pub address_components: Vec<AddressComponent>,
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Map a Google component type onto the canonical kind.
fn component_kind(type_name: &str) -> Option<ComponentKind> {
    let kind = match type_name {
        "street_number" => ComponentKind::StreetNumber,
        "route" => ComponentKind::Route,
        "neighborhood" => ComponentKind::Neighbourhood,
        "sublocality" => ComponentKind::Sublocality(0),
        "locality" => ComponentKind::Locality,
        "administrative_area_level_2" => ComponentKind::AdministrativeAreaLevel2,
        "administrative_area_level_1" => ComponentKind::AdministrativeAreaLevel1,
        "postal_code" => ComponentKind::PostalCode,
        "country" => ComponentKind::Country,
        other => {
            let level = other.strip_prefix("sublocality_level_")?.parse::<u8>().ok()?;
            if level == 0 || level > MAX_SUBLOCALITY_LEVEL {
                return None;
            }
            ComponentKind::Sublocality(level)
        }
    };
    Some(kind)
}

impl From<GooglePlace> for ProviderResult {
    fn from(place: GooglePlace) -> Self {
        let mut result = ProviderResult::new(place.formatted_address.unwrap_or_default());

        for component in &place.address_components {
            for kind in component.types.iter().filter_map(|t| component_kind(t)) {
                result.insert_component(kind, component.long_name.as_str());
            }
        }

        if let Some(geometry) = place.geometry {
            let coordinates = Coordinates::new(geometry.location.lat, geometry.location.lng);
            if coordinates.is_valid() {
                result.coordinates = Some(coordinates);
            }
        }

        result
    }
}

/// Parse a `geocode/json` response body, mapping the `status` field to errors.
pub fn parse_response(body: &str) -> GeocodeResult<Vec<ProviderResult>> {
    let response: GeocodeResponse = serde_json::from_str(body).map_err(GeocodeError::JsonError)?;
    let message = response
        .error_message
        .clone()
        .unwrap_or_else(|| response.status.clone());

    match response.status.as_str() {
        "OK" => Ok(response.results.into_iter().map(ProviderResult::from).collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        "REQUEST_DENIED" => Err(GeocodeError::Unauthorized),
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Err(GeocodeError::RateLimitExceeded),
        "INVALID_REQUEST" => Err(GeocodeError::ApiError {
            status: 400,
            message,
        }),
        _ => Err(GeocodeError::ProviderUnavailable(message)),
    }
}
