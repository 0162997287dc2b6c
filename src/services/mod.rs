//! Application service layer.
//!
//! Services contain business logic and orchestrate interactions between the
//! address store, the validator and the location search. They provide a clean
//! boundary between the MCP handlers and the core.

mod address_service;

pub use address_service::{AddressService, AddressServiceImpl};
