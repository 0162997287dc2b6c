//! Predicates gating what may enter an address collection.
//!
//! Both checks are pure and total. The collection calls
//! [`is_complete_address`] on every add and update; the service calls
//! [`is_valid_phone`] before listing addresses for a contact.

use crate::domain::PhoneNumber;
use crate::models::AddressDetails;

/// True iff `phone` is exactly ten ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PhoneNumber::is_valid(phone)
}

/// True iff every required field of the address is filled in.
///
/// Required: a valid phone, and non-blank `unit`, `line1`, `city`, `region`
/// and `postal_code`. `line2` and the label are optional.
pub fn is_complete_address(details: &AddressDetails) -> bool {
    missing_fields(details).is_empty()
}

/// Names of the required fields that are blank or invalid, in form order.
pub fn missing_fields(details: &AddressDetails) -> Vec<&'static str> {
    let mut missing = Vec::new();

    if !is_valid_phone(&details.phone) {
        missing.push("phone");
    }

    let required = [
        ("unit", &details.unit),
        ("line1", &details.line1),
        ("city", &details.city),
        ("region", &details.region),
        ("postal_code", &details.postal_code),
    ];

    missing.extend(
        required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name),
    );

    missing
}
