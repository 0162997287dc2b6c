//! Error types for the address MCP server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! None of these are fatal: every failure leaves the address collection unchanged
//! and the caller decides what to do next.

use crate::domain::ValidationError;
use thiserror::Error;

/// Errors raised by address collection and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A draft or update failed the completeness check
    #[error("Address is incomplete, missing: {}", .fields.join(", "))]
    ValidationFailed { fields: Vec<String> },

    /// The referenced address id does not exist
    #[error("Address not found: {0}")]
    NotFound(String),

    /// The supplied contact phone number is not 10 digits
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    /// Malformed request arguments
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<ValidationError> for AddressError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidPhone(phone) => AddressError::InvalidPhone(phone),
            ValidationError::EmptyId => AddressError::InvalidRequest(err.to_string()),
        }
    }
}

/// Errors that can occur when calling a geocoding provider.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Provider returned an error status
    #[error("Provider error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// API key rejected
    #[error("Authentication failed")]
    Unauthorized,

    /// Provider quota exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider reachable but returned nothing usable
    #[error("Geocoding provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with AddressError
pub type AddressResult<T> = Result<T, AddressError>;

/// Convenience type alias for Results with GeocodeError
pub type GeocodeResult<T> = Result<T, GeocodeError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AddressError::NotFound("addr-9".to_string());
        assert_eq!(err.to_string(), "Address not found: addr-9");

        let err = AddressError::ValidationFailed {
            fields: vec!["unit".to_string(), "postal_code".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Address is incomplete, missing: unit, postal_code"
        );

        let err = ConfigError::MissingVar("GOOGLE_MAPS_API_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: GOOGLE_MAPS_API_KEY"
        );

        let err = GeocodeError::ProviderUnavailable("empty body".to_string());
        assert_eq!(
            err.to_string(),
            "Geocoding provider unavailable: empty body"
        );
    }

    #[test]
    fn test_api_error_variants() {
        let err = GeocodeError::ApiError {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: AddressError = ValidationError::InvalidPhone("12".to_string()).into();
        assert_eq!(err, AddressError::InvalidPhone("12".to_string()));

        let err: AddressError = ValidationError::EmptyId.into();
        assert!(matches!(err, AddressError::InvalidRequest(_)));
    }
}
