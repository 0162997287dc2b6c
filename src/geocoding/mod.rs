//! Geocoding result normalization.
//!
//! Every provider integration converts its raw payload into a [`ProviderResult`]
//! (an unordered mapping of [`ComponentKind`] to text plus the formatted address).
//! The [`normalizer`] then turns that canonical shape into an [`AddressFragment`]
//! without knowing which provider produced it.
//!
//! - **nominatim**: OpenStreetMap Nominatim search and reverse payloads
//! - **google**: Google Geocoding API payloads
//! - **normalizer**: field-resolution rules shared by all providers

pub mod google;
pub mod nominatim;
pub mod normalizer;

pub use normalizer::{extract_postal_code, normalize, AddressFragment};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of an address component, independent of the provider vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    StreetNumber,
    Route,
    Neighbourhood,
    /// Sublocality level 1..=5, or 0 when the provider gives no level
    Sublocality(u8),
    Locality,
    AdministrativeAreaLevel2,
    AdministrativeAreaLevel1,
    PostalCode,
    Country,
}

/// Highest sublocality level providers report.
pub const MAX_SUBLOCALITY_LEVEL: u8 = 5;

/// A point on the map in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both values are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Canonical provider result: address components plus the display string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProviderResult {
    components: BTreeMap<ComponentKind, String>,

    /// Provider's formatted/display address, verbatim
    pub formatted_address: String,

    pub coordinates: Option<Coordinates>,
}

impl ProviderResult {
    pub fn new(formatted_address: impl Into<String>) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            ..Self::default()
        }
    }

    /// Builder form of [`ProviderResult::insert_component`].
    pub fn with_component(mut self, kind: ComponentKind, value: impl Into<String>) -> Self {
        self.insert_component(kind, value);
        self
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Record a component value.
    ///
    /// Blank values are dropped and the first non-blank value for a kind is
    /// kept. Returns whether the value was stored.
    pub fn insert_component(&mut self, kind: ComponentKind, value: impl Into<String>) -> bool {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() || self.components.contains_key(&kind) {
            return false;
        }
        self.components.insert(kind, value.to_string());
        true
    }

    /// Non-blank value for a component kind.
    pub fn component(&self, kind: ComponentKind) -> Option<&str> {
        self.components.get(&kind).map(String::as_str)
    }

    pub fn components(&self) -> impl Iterator<Item = (ComponentKind, &str)> {
        self.components.iter().map(|(kind, value)| (*kind, value.as_str()))
    }
}

/// Supported geocoding backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// OpenStreetMap Nominatim search-by-text
    #[default]
    Nominatim,
    /// Google Geocoding API
    Google,
}

impl ProviderKind {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Nominatim => "https://nominatim.openstreetmap.org",
            ProviderKind::Google => "https://maps.googleapis.com/maps/api",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nominatim" | "osm" => Ok(ProviderKind::Nominatim),
            "google" => Ok(ProviderKind::Google),
            other => Err(format!(
                "Unknown geocoding provider '{}', expected 'nominatim' or 'google'",
                other
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Nominatim => write!(f, "nominatim"),
            ProviderKind::Google => write!(f, "google"),
        }
    }
}
