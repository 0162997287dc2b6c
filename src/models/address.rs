//! Address model: the canonical saved delivery address.

use crate::domain::AddressId;
use crate::error::AddressError;
use crate::geocoding::AddressFragment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category an address is saved under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddressLabel {
    #[default]
    Home,
    Work,
    /// Free-text label chosen by the user
    Other(String),
}

impl AddressLabel {
    /// Build a label from a category name and an optional custom label.
    ///
    /// The category is matched case-insensitively. A custom label is only
    /// meaningful for `Other`; it is ignored for `Home` and `Work`.
    pub fn from_parts(category: &str, custom_label: Option<String>) -> Result<Self, AddressError> {
        match category.parse::<LabelCategory>()? {
            LabelCategory::Home => Ok(AddressLabel::Home),
            LabelCategory::Work => Ok(AddressLabel::Work),
            LabelCategory::Other => Ok(AddressLabel::Other(
                custom_label.unwrap_or_default().trim().to_string(),
            )),
        }
    }

    /// Human-readable label, falling back to "Other" for a blank custom label.
    pub fn display_name(&self) -> &str {
        match self {
            AddressLabel::Home => "Home",
            AddressLabel::Work => "Work",
            AddressLabel::Other(custom) if custom.trim().is_empty() => "Other",
            AddressLabel::Other(custom) => custom.as_str(),
        }
    }
}

impl fmt::Display for AddressLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Label category without the custom text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelCategory {
    Home,
    Work,
    Other,
}

impl FromStr for LabelCategory {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(LabelCategory::Home),
            "work" => Ok(LabelCategory::Work),
            "other" => Ok(LabelCategory::Other),
            other => Err(AddressError::InvalidRequest(format!(
                "Unknown address label '{}', expected Home, Work or Other",
                other
            ))),
        }
    }
}

/// The user-editable part of an address.
///
/// This is also the draft type: a draft is an `AddressDetails` that has not
/// yet been admitted to a collection and may still be incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AddressDetails {
    /// Save-as category
    pub label: AddressLabel,

    /// Contact phone (10 digits once admitted)
    pub phone: String,

    /// House/flat number and building name
    pub unit: String,

    /// Street-level address
    pub line1: String,

    /// Area, landmark or other supplemental locality
    pub line2: String,

    pub city: String,

    /// State
    pub region: String,

    /// PIN code
    pub postal_code: String,
}

impl AddressDetails {
    /// Start an empty draft for the given contact phone.
    pub fn draft_for(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Merge a normalized geocoding fragment into this draft.
    ///
    /// Location-derived fields are replaced wholesale; `label`, `phone` and
    /// `unit` are left as the user entered them.
    pub fn apply_fragment(&mut self, fragment: &AddressFragment) {
        self.line1 = fragment.street_address.clone();
        self.line2 = fragment.line2.clone();
        self.city = fragment.city.clone();
        self.region = fragment.region.clone();
        self.postal_code = fragment.postal_code.clone();
    }

    /// One-line rendering used in listings.
    pub fn summary(&self) -> String {
        [
            self.unit.as_str(),
            self.line1.as_str(),
            self.line2.as_str(),
            self.city.as_str(),
            self.region.as_str(),
            self.postal_code.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A saved address admitted to an [`AddressCollection`](crate::store::AddressCollection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Assigned at creation, immutable thereafter
    pub id: AddressId,

    #[serde(flatten)]
    pub details: AddressDetails,

    /// At most one record per collection is selected
    #[serde(default)]
    pub is_selected: bool,
}

impl AddressRecord {
    pub fn id(&self) -> &AddressId {
        &self.id
    }

    pub fn phone(&self) -> &str {
        &self.details.phone
    }
}
