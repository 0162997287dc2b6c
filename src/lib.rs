//! Address MCP Server - saved delivery addresses over the Model Context Protocol.
//!
//! This library lets an AI assistant manage the delivery addresses tied to a
//! contact phone number: look up a location through a geocoding provider,
//! turn the provider's answer into address fields, validate the draft, save it,
//! and pick exactly one address to deliver to.
//!
//! # Architecture
//!
//! - **domain**: Value objects for phone numbers and address ids
//! - **models**: Address records, drafts and labels
//! - **geocoding**: Provider result shape, provider adapters and the normalizer
//! - **validation**: Phone and address completeness rules
//! - **store**: The ordered address collection with its single-selection rule
//! - **client**: HTTP client for Nominatim and Google geocoding
//! - **search**: Debounced, latest-wins location search
//! - **cache**: TTL cache for search results
//! - **services**: The phone → search → confirm → commit flow
//! - **server**: MCP protocol server

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod geocoding;
pub mod metrics;
pub mod models;
pub mod search;
pub mod server;
pub mod services;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use cache::SearchCache;
pub use client::{AsyncGeocodingClient, Geocoder, GeocodingClient};
pub use config::Config;
pub use domain::{AddressId, PhoneNumber, ValidationError};
pub use error::{AddressError, ConfigError, GeocodeError};
pub use geocoding::{
    normalize, AddressFragment, ComponentKind, Coordinates, ProviderKind, ProviderResult,
};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{AddressDetails, AddressLabel, AddressRecord};
pub use search::{LocationCandidate, LocationSearch, SearchOutcome};
pub use server::AddressMcpServer;
pub use services::{AddressService, AddressServiceImpl};
pub use store::{new_store, AddressCollection, AddressStore};
