//! Data models for saved delivery addresses.

pub mod address;

pub use address::{AddressDetails, AddressLabel, AddressRecord};
