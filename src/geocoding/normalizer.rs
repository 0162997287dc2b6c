//! Conversion of canonical provider results into address fragments.
//!
//! Each output field is resolved from a fixed priority list of component
//! kinds; the first present, non-blank value wins. Nothing here can fail: a
//! result with no usable components yields empty fields, and completing them
//! is left to manual entry.

use super::{ComponentKind, ProviderResult, MAX_SUBLOCALITY_LEVEL};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Six-digit PIN code that is not part of a longer digit run.
static PIN_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{6})(?:[^0-9]|$)").expect("Failed to compile PIN code regex")
});

/// Best-effort partial address derived from a geocoding result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressFragment {
    /// Road name, street number, or the full address as a last resort
    pub street_address: String,

    /// Neighbourhood or sublocality; may be empty
    pub line2: String,

    pub city: String,

    pub region: String,

    /// Empty when unresolved
    pub postal_code: String,

    /// Provider display string, verbatim
    pub full_address: String,
}

/// Normalize a provider result into an [`AddressFragment`].
pub fn normalize(result: &ProviderResult) -> AddressFragment {
    let full_address = result.formatted_address.clone();

    let street_address = first_of(result, &[ComponentKind::Route, ComponentKind::StreetNumber])
        .map(str::to_string)
        .unwrap_or_else(|| full_address.clone());

    let line2 = first_of(result, &[ComponentKind::Neighbourhood])
        .or_else(|| most_specific_sublocality(result))
        .unwrap_or_default()
        .to_string();

    let city = first_of(
        result,
        &[ComponentKind::Locality, ComponentKind::AdministrativeAreaLevel2],
    )
    .unwrap_or_default()
    .to_string();

    let region = first_of(result, &[ComponentKind::AdministrativeAreaLevel1])
        .unwrap_or_default()
        .to_string();

    let postal_code = first_of(result, &[ComponentKind::PostalCode])
        .or_else(|| extract_postal_code(&full_address))
        .unwrap_or_default()
        .to_string();

    AddressFragment {
        street_address,
        line2,
        city,
        region,
        postal_code,
        full_address,
    }
}

/// Find the first six-digit run in free text, e.g. `"Mumbai 400001 India"`.
pub fn extract_postal_code(text: &str) -> Option<&str> {
    PIN_CODE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn first_of<'a>(result: &'a ProviderResult, kinds: &[ComponentKind]) -> Option<&'a str> {
    kinds.iter().find_map(|kind| result.component(*kind))
}

fn most_specific_sublocality(result: &ProviderResult) -> Option<&str> {
    (1..=MAX_SUBLOCALITY_LEVEL)
        .rev()
        .chain(std::iter::once(0))
        .find_map(|level| result.component(ComponentKind::Sublocality(level)))
}
