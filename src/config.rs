//! Configuration management for the address MCP server.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is honoured through `dotenvy`, which never writes to stdout (the MCP
//! transport).

use crate::error::{ConfigError, ConfigResult};
use crate::geocoding::ProviderKind;
use std::env;

/// Upper bound for `MAX_SEARCH_RESULTS`.
const MAX_SEARCH_RESULTS_LIMIT: usize = 50;

/// Upper bound for `GEOCODE_CACHE_TTL_MINUTES` (one week).
const MAX_CACHE_TTL_MINUTES: u64 = 7 * 24 * 60;

/// Configuration for the address MCP server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which geocoding backend to call
    pub provider: ProviderKind,

    /// Base URL of the geocoding API
    pub geocoder_base_url: String,

    /// API key, required for Google
    pub geocoder_api_key: Option<String>,

    /// Comma-separated ISO country codes searches are restricted to (default: "in")
    pub country_codes: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Maximum number of locations returned per search (default: 5)
    pub max_search_results: usize,

    /// Quiet period before a search query is sent, in milliseconds (default: 300)
    pub search_debounce_ms: u64,

    /// How long search results stay cached, in minutes (default: 30)
    pub cache_ttl_minutes: u64,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `GEOCODER_PROVIDER`: `nominatim` or `google` (default: nominatim)
    /// - `GEOCODER_BASE_URL`: API base URL (default depends on provider)
    /// - `GOOGLE_MAPS_API_KEY`: API key, required when the provider is google
    /// - `GEOCODER_COUNTRY_CODES`: country restriction (default: "in")
    /// - `GEOCODER_USER_AGENT`: User-Agent header
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `MAX_SEARCH_RESULTS`: results per search, 1-50 (default: 5)
    /// - `SEARCH_DEBOUNCE_MS`: debounce delay (default: 300)
    /// - `GEOCODE_CACHE_TTL_MINUTES`: result cache TTL, at most one week (default: 30)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let provider = match env::var("GEOCODER_PROVIDER") {
            Ok(val) => val
                .parse::<ProviderKind>()
                .map_err(|reason| ConfigError::InvalidValue {
                    var: "GEOCODER_PROVIDER".to_string(),
                    reason,
                })?,
            Err(_) => ProviderKind::default(),
        };

        let geocoder_base_url = env::var("GEOCODER_BASE_URL")
            .unwrap_or_else(|_| provider.default_base_url().to_string());

        if !geocoder_base_url.starts_with("http://") && !geocoder_base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                var: "GEOCODER_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let geocoder_api_key = env::var("GOOGLE_MAPS_API_KEY").ok();
        if provider == ProviderKind::Google {
            match geocoder_api_key.as_deref() {
                None => return Err(ConfigError::MissingVar("GOOGLE_MAPS_API_KEY".to_string())),
                Some(key) if key.trim().is_empty() => {
                    return Err(ConfigError::InvalidValue {
                        var: "GOOGLE_MAPS_API_KEY".to_string(),
                        reason: "Cannot be empty".to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        let country_codes =
            env::var("GEOCODER_COUNTRY_CODES").unwrap_or_else(|_| "in".to_string());
        let user_agent = env::var("GEOCODER_USER_AGENT").unwrap_or_else(|_| default_user_agent());

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let max_search_results = Self::parse_env_usize("MAX_SEARCH_RESULTS", 5)?;
        let search_debounce_ms = Self::parse_env_u64("SEARCH_DEBOUNCE_MS", 300)?;
        let cache_ttl_minutes = Self::parse_env_u64("GEOCODE_CACHE_TTL_MINUTES", 30)?;

        if max_search_results == 0 || max_search_results > MAX_SEARCH_RESULTS_LIMIT {
            return Err(ConfigError::InvalidValue {
                var: "MAX_SEARCH_RESULTS".to_string(),
                reason: format!("Must be between 1 and {}", MAX_SEARCH_RESULTS_LIMIT),
            });
        }

        if cache_ttl_minutes > MAX_CACHE_TTL_MINUTES {
            return Err(ConfigError::InvalidValue {
                var: "GEOCODE_CACHE_TTL_MINUTES".to_string(),
                reason: format!("Must be at most {}", MAX_CACHE_TTL_MINUTES),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            provider,
            geocoder_base_url,
            geocoder_api_key,
            country_codes,
            user_agent,
            request_timeout,
            max_search_results,
            search_debounce_ms,
            cache_ttl_minutes,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

fn default_user_agent() -> String {
    format!("address-mcp-server/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        let provider = ProviderKind::default();
        Config {
            provider,
            geocoder_base_url: provider.default_base_url().to_string(),
            geocoder_api_key: None,
            country_codes: "in".to_string(),
            user_agent: default_user_agent(),
            request_timeout: 10,
            max_search_results: 5,
            search_debounce_ms: 300,
            cache_ttl_minutes: 30,
            log_level: "error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const MANAGED_VARS: &[&str] = &[
        "GEOCODER_PROVIDER",
        "GEOCODER_BASE_URL",
        "GOOGLE_MAPS_API_KEY",
        "GEOCODER_COUNTRY_CODES",
        "GEOCODER_USER_AGENT",
        "REQUEST_TIMEOUT",
        "MAX_SEARCH_RESULTS",
        "SEARCH_DEBOUNCE_MS",
        "GEOCODE_CACHE_TTL_MINUTES",
    ];

    // Clears the managed variables on creation and again on drop
    struct EnvGuard;

    impl EnvGuard {
        fn new() -> Self {
            for var in MANAGED_VARS {
                env::remove_var(var);
            }
            EnvGuard
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in MANAGED_VARS {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.provider, ProviderKind::Nominatim);
        assert_eq!(config.geocoder_base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.country_codes, "in");
        assert_eq!(config.max_search_results, 5);
        assert_eq!(config.search_debounce_ms, 300);
        assert!(config.user_agent.starts_with("address-mcp-server/"));
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        let _guard = EnvGuard::new();

        let config = Config::from_env().unwrap();
        assert_eq!(config.provider, ProviderKind::Nominatim);
        assert_eq!(config.request_timeout, 10);
        assert_eq!(config.cache_ttl_minutes, 30);
    }

    #[test]
    #[serial]
    fn test_config_google_requires_key() {
        let mut guard = EnvGuard::new();
        guard.set("GEOCODER_PROVIDER", "google");

        match Config::from_env() {
            Err(ConfigError::MissingVar(var)) => assert_eq!(var, "GOOGLE_MAPS_API_KEY"),
            other => panic!("Expected MissingVar error, got: {:?}", other),
        }

        guard.set("GOOGLE_MAPS_API_KEY", "  ");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidValue { .. })
        ));

        guard.set("GOOGLE_MAPS_API_KEY", "maps-key");
        let config = Config::from_env().unwrap();
        assert_eq!(config.provider, ProviderKind::Google);
        assert_eq!(config.geocoder_base_url, "https://maps.googleapis.com/maps/api");
        assert_eq!(config.geocoder_api_key.as_deref(), Some("maps-key"));
    }

    #[test]
    #[serial]
    fn test_config_invalid_provider() {
        let mut guard = EnvGuard::new();
        guard.set("GEOCODER_PROVIDER", "mapbox");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "GEOCODER_PROVIDER"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_url() {
        let mut guard = EnvGuard::new();
        guard.set("GEOCODER_BASE_URL", "nominatim.local");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "GEOCODER_BASE_URL"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_max_results_bounds() {
        let mut guard = EnvGuard::new();
        guard.set("MAX_SEARCH_RESULTS", "0");
        assert!(Config::from_env().is_err());

        guard.set("MAX_SEARCH_RESULTS", "51");
        assert!(Config::from_env().is_err());

        guard.set("MAX_SEARCH_RESULTS", "10");
        assert_eq!(Config::from_env().unwrap().max_search_results, 10);
    }

    #[test]
    #[serial]
    fn test_config_cache_ttl_bounds() {
        let mut guard = EnvGuard::new();
        guard.set("GEOCODE_CACHE_TTL_MINUTES", "18446744073709551615");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => {
                assert_eq!(var, "GEOCODE_CACHE_TTL_MINUTES")
            }
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }

        guard.set("GEOCODE_CACHE_TTL_MINUTES", "10080");
        assert_eq!(Config::from_env().unwrap().cache_ttl_minutes, 10080);
    }

    #[test]
    #[serial]
    fn test_config_overrides() {
        let mut guard = EnvGuard::new();
        guard.set("GEOCODER_BASE_URL", "http://localhost:8080");
        guard.set("GEOCODER_COUNTRY_CODES", "in,np");
        guard.set("SEARCH_DEBOUNCE_MS", "0");
        guard.set("GEOCODE_CACHE_TTL_MINUTES", "5");

        let config = Config::from_env().unwrap();
        assert_eq!(config.geocoder_base_url, "http://localhost:8080");
        assert_eq!(config.country_codes, "in,np");
        assert_eq!(config.search_debounce_ms, 0);
        assert_eq!(config.cache_ttl_minutes, 5);
    }

    #[test]
    #[serial]
    fn test_parse_env_u64_invalid() {
        let mut guard = EnvGuard::new();
        guard.set("REQUEST_TIMEOUT", "soon");

        let result = Config::parse_env_u64("REQUEST_TIMEOUT", 10);
        assert!(result.is_err());
        assert_eq!(Config::parse_env_u64("NONEXISTENT_ADDRESS_VAR", 7).unwrap(), 7);
    }
}
