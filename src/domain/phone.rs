//! PhoneNumber value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Required number of digits in a contact phone number.
pub const PHONE_DIGITS: usize = 10;

/// A validated 10-digit contact phone number.
///
/// Saved addresses are grouped by the phone of the person receiving the
/// delivery. No country code, leading-zero or checksum rules apply: the
/// number must be exactly ten ASCII digits and nothing else.
///
/// # Example
///
/// ```
/// use address_mcp_server::domain::PhoneNumber;
///
/// let phone = PhoneNumber::new("9876543210").unwrap();
/// assert_eq!(phone.as_str(), "9876543210");
/// assert!(PhoneNumber::new("+91 98765 43210").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a new PhoneNumber, validating the format.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPhone` unless the input is exactly
    /// ten decimal digits.
    pub fn new(phone: impl Into<String>) -> Result<Self, ValidationError> {
        let phone = phone.into();

        if !Self::is_valid(&phone) {
            return Err(ValidationError::InvalidPhone(phone));
        }

        Ok(Self(phone))
    }

    /// Check whether `phone` is a valid contact number without allocating.
    pub fn is_valid(phone: &str) -> bool {
        // Byte length equals char count once every char is ASCII.
        !phone.is_empty()
            && phone.chars().all(|c| c.is_ascii_digit())
            && phone.len() == PHONE_DIGITS
    }

    /// Strip everything but digits from free-form input.
    ///
    /// Used when accepting typed input; the result still has to pass
    /// [`PhoneNumber::new`].
    pub fn digits_only(input: &str) -> String {
        input.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Get the phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PhoneNumber::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
