//! Adapter for OpenStreetMap Nominatim payloads.
//!
//! Search responses are a JSON array of places; reverse responses are a single
//! place, or `{"error": "..."}` when nothing is found at the coordinates.

use super::{ComponentKind, Coordinates, ProviderResult};
use crate::error::{GeocodeError, GeocodeResult};
use serde::Deserialize;

/// A place as returned by `/search` and `/reverse` with `addressdetails=1`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NominatimPlace {
    pub display_name: String,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub address: NominatimAddress,
}

/// The `address` breakdown of a Nominatim place.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NominatimAddress {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub quarter: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state_district: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

impl From<NominatimPlace> for ProviderResult {
    fn from(place: NominatimPlace) -> Self {
        let mut result = ProviderResult::new(place.display_name);
        let address = place.address;

        let mappings = [
            (ComponentKind::StreetNumber, address.house_number),
            (ComponentKind::Route, address.road),
            (ComponentKind::Neighbourhood, address.neighbourhood),
            (ComponentKind::Sublocality(1), address.suburb),
            (ComponentKind::Sublocality(2), address.quarter),
            // city, town and village compete for the same slot in that order
            (ComponentKind::Locality, address.city),
            (ComponentKind::Locality, address.town),
            (ComponentKind::Locality, address.village),
            (ComponentKind::AdministrativeAreaLevel2, address.state_district),
            (ComponentKind::AdministrativeAreaLevel2, address.county),
            (ComponentKind::AdministrativeAreaLevel1, address.state),
            (ComponentKind::PostalCode, address.postcode),
            (ComponentKind::Country, address.country),
        ];

        for (kind, value) in mappings {
            if let Some(value) = value {
                result.insert_component(kind, value);
            }
        }

        let lat = place.lat.as_deref().and_then(|v| v.trim().parse::<f64>().ok());
        let lon = place.lon.as_deref().and_then(|v| v.trim().parse::<f64>().ok());
        if let (Some(lat), Some(lon)) = (lat, lon) {
            let coordinates = Coordinates::new(lat, lon);
            if coordinates.is_valid() {
                result.coordinates = Some(coordinates);
            }
        }

        result
    }
}

/// Parse a `/search` response body.
pub fn parse_search_response(body: &str) -> GeocodeResult<Vec<ProviderResult>> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body).map_err(GeocodeError::JsonError)?;
    Ok(places.into_iter().map(ProviderResult::from).collect())
}

/// Parse a `/reverse` response body.
///
/// An `error` object means no place at the coordinates and yields an empty list.
pub fn parse_reverse_response(body: &str) -> GeocodeResult<Vec<ProviderResult>> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(GeocodeError::JsonError)?;

    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        tracing::debug!("Nominatim reverse lookup found nothing: {}", message);
        return Ok(Vec::new());
    }

    let place: NominatimPlace = serde_json::from_value(value).map_err(GeocodeError::JsonError)?;
    Ok(vec![ProviderResult::from(place)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::normalize;

    const SEARCH_BODY: &str = r#"[
        {
            "place_id": 1,
            "lat": "18.9322",
            "lon": "72.8264",
            "display_name": "Marine Drive, Churchgate, Mumbai, Maharashtra, 400020, India",
            "address": {
                "road": "Marine Drive",
                "neighbourhood": "Churchgate",
                "suburb": "A Ward",
                "city": "Mumbai",
                "state_district": "Mumbai City",
                "state": "Maharashtra",
                "postcode": "400020",
                "country": "India",
                "country_code": "in"
            }
        },
        {
            "display_name": "Lonavala, Pune, Maharashtra, India",
            "address": {
                "town": "Lonavala",
                "state": "Maharashtra"
            }
        }
    ]"#;

    #[test]
    fn test_parse_search_response() {
        let results = parse_search_response(SEARCH_BODY).unwrap();
        assert_eq!(results.len(), 2);

        let first = &results[0];
        assert_eq!(first.component(ComponentKind::Route), Some("Marine Drive"));
        assert_eq!(first.component(ComponentKind::Sublocality(1)), Some("A Ward"));
        assert_eq!(first.component(ComponentKind::Locality), Some("Mumbai"));
        assert_eq!(
            first.component(ComponentKind::AdministrativeAreaLevel2),
            Some("Mumbai City")
        );
        assert_eq!(first.coordinates, Some(Coordinates::new(18.9322, 72.8264)));

        let fragment = normalize(first);
        assert_eq!(fragment.street_address, "Marine Drive");
        assert_eq!(fragment.line2, "Churchgate");
        assert_eq!(fragment.postal_code, "400020");
    }

    #[test]
    fn test_town_used_when_city_missing() {
        let results = parse_search_response(SEARCH_BODY).unwrap();
        let fragment = normalize(&results[1]);
        assert_eq!(fragment.city, "Lonavala");
        assert_eq!(fragment.street_address, "Lonavala, Pune, Maharashtra, India");
        assert_eq!(fragment.postal_code, "");
        assert_eq!(results[1].coordinates, None);
    }

    #[test]
    fn test_missing_address_block_degrades() {
        let results = parse_search_response(r#"[{"display_name": "Fort, Mumbai 400001 India"}]"#)
            .unwrap();
        let fragment = normalize(&results[0]);
        assert_eq!(fragment.postal_code, "400001");
        assert_eq!(fragment.city, "");
    }

    #[test]
    fn test_malformed_coordinates_ignored() {
        let results =
            parse_search_response(r#"[{"display_name": "x", "lat": "north", "lon": "72.8"}]"#)
                .unwrap();
        assert_eq!(results[0].coordinates, None);
    }

    #[test]
    fn test_parse_search_rejects_non_json() {
        assert!(matches!(
            parse_search_response("<html>busy</html>"),
            Err(GeocodeError::JsonError(_))
        ));
    }

    #[test]
    fn test_parse_reverse_response() {
        let body = r#"{
            "display_name": "Bandra West, Mumbai, Maharashtra 400050, India",
            "lat": "19.06", "lon": "72.83",
            "address": {"suburb": "Bandra West", "city": "Mumbai", "state": "Maharashtra"}
        }"#;
        let results = parse_reverse_response(body).unwrap();
        assert_eq!(results.len(), 1);
        let fragment = normalize(&results[0]);
        assert_eq!(fragment.line2, "Bandra West");
        assert_eq!(fragment.postal_code, "400050");
    }

    #[test]
    fn test_parse_reverse_error_is_empty() {
        let results = parse_reverse_response(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(results.is_empty());
    }
}
