//! AddressId value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque identifier of a saved address.
///
/// Ids are minted by [`AddressCollection`](crate::store::AddressCollection)
/// when a draft is admitted and never change afterwards. Callers that receive
/// an id from the outside (an MCP tool argument, for instance) go through
/// [`AddressId::new`], which only rejects empty input.
///
/// # Example
///
/// ```
/// use address_mcp_server::domain::AddressId;
///
/// let id = AddressId::new("addr-7").unwrap();
/// assert_eq!(id.as_str(), "addr-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressId(String);

impl AddressId {
    /// Create an AddressId from caller-supplied text, rejecting empty input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyId` if the trimmed input is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Mint the id for the `sequence`-th address admitted to a collection.
    pub(crate) fn from_sequence(sequence: u64) -> Self {
        Self(format!("addr-{}", sequence))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Serialize for AddressId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AddressId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AddressId::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
