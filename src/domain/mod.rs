//! Domain value objects and types.
//!
//! Type-safe wrappers for address identifiers and contact phone numbers.
//! These value objects validate at construction time so that invalid ids or
//! numbers cannot be represented once they cross into the service layer.

pub mod address_id;
pub mod errors;
pub mod phone;

pub use address_id::AddressId;
pub use errors::ValidationError;
pub use phone::PhoneNumber;
