//! Address MCP Server - Main entry point
//!
//! This is the main executable for the Address MCP Server, which exposes saved
//! delivery address management over the Model Context Protocol (MCP).

use anyhow::Result;
use address_mcp_server::{
    new_store, AddressMcpServer, AddressService, AddressServiceImpl, AsyncGeocodingClient, Config,
    Geocoder, GeocodingClient, LocationSearch, Metrics,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration before logging so LOG_LEVEL can seed the filter
    let config = Config::from_env();
    let default_level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting Address MCP Server with {} geocoder at {}",
        config.provider, config.geocoder_base_url
    );

    let metrics = Metrics::new();

    // Initialize geocoding client
    let sync_client = GeocodingClient::new(&config).with_metrics(metrics.clone());
    let geocoder = Arc::new(AsyncGeocodingClient::new(sync_client)) as Arc<dyn Geocoder>;

    let cache_ttl_secs = config.cache_ttl_minutes.saturating_mul(60); // Convert minutes to seconds
    let search = LocationSearch::new(
        geocoder,
        Duration::from_millis(config.search_debounce_ms),
        Duration::from_secs(cache_ttl_secs),
    )
    .with_metrics(metrics.clone());

    let service =
        Arc::new(AddressServiceImpl::new(new_store(), search)) as Arc<dyn AddressService>;
    let server = AddressMcpServer::new(service);

    info!("Address MCP Server initialized");
    info!(
        "Search debounce: {} ms, cache TTL: {} minutes",
        config.search_debounce_ms, config.cache_ttl_minutes
    );

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    address_mcp_server::server::run_server(server).await?;

    let summary = metrics.summary();
    info!(
        requests = summary.http_requests_total,
        errors = summary.http_errors_total,
        avg_ms = summary.http_duration_avg_ms,
        cache_hits = summary.cache_hits_total,
        superseded = summary.superseded_total,
        degraded = summary.degraded_total,
        "Address MCP Server shutdown complete"
    );
    Ok(())
}
