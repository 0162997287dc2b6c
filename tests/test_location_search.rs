//! Tests for the debounced, latest-wins location search.
//!
//! Time is paused so debounce windows and provider latency are deterministic.

mod mocks;

use address_mcp_server::geocoding::{ComponentKind, ProviderResult};
use address_mcp_server::{Geocoder, LocationSearch, SearchOutcome};
use mocks::MockGeocoder;
use std::sync::Arc;
use std::time::Duration;

fn hill_road() -> ProviderResult {
    ProviderResult::new("Hill Road, Bandra West, Mumbai, Maharashtra 400050, India")
        .with_component(ComponentKind::Route, "Hill Road")
        .with_component(ComponentKind::Sublocality(1), "Bandra West")
        .with_component(ComponentKind::Locality, "Mumbai")
        .with_component(ComponentKind::AdministrativeAreaLevel1, "Maharashtra")
}

fn location_search(geocoder: &MockGeocoder, debounce_ms: u64, cache_ttl: Duration) -> LocationSearch {
    LocationSearch::new(
        Arc::new(geocoder.clone()) as Arc<dyn Geocoder>,
        Duration::from_millis(debounce_ms),
        cache_ttl,
    )
}

#[tokio::test(start_paused = true)]
async fn test_newer_query_supersedes_during_debounce() {
    let geocoder = MockGeocoder::new();
    geocoder.add_places("Hill Road", vec![hill_road()]);
    let search = location_search(&geocoder, 300, Duration::ZERO);

    let first = tokio::spawn({
        let search = search.clone();
        async move { search.search("Hill").await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = search.search("Hill Road").await;
    let first = first.await.unwrap();

    assert!(first.is_superseded());
    let results = second.into_results().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].fragment.street_address, "Hill Road");
    assert_eq!(results[0].fragment.postal_code, "400050");

    // Only the settled query reached the provider
    assert_eq!(geocoder.queries(), vec!["Hill Road".to_string()]);
    assert_eq!(search.metrics().superseded_total(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    let geocoder = MockGeocoder::new();
    geocoder.add_places("Hill", vec![hill_road(), hill_road()]);
    geocoder.add_places("Hill Road", vec![hill_road()]);
    geocoder.set_latency(Duration::from_millis(500));
    let search = location_search(&geocoder, 0, Duration::ZERO);

    let first = tokio::spawn({
        let search = search.clone();
        async move { search.search("Hill").await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = search.search("Hill Road").await;
    let first = first.await.unwrap();

    // The older request answered first but was no longer wanted
    assert_eq!(first, SearchOutcome::Superseded);
    assert_eq!(second.into_results().unwrap().len(), 1);
    assert_eq!(geocoder.get_call_count("search"), 2);
}

#[tokio::test]
async fn test_older_ticket_is_superseded() {
    let geocoder = MockGeocoder::new();
    geocoder.add_places("Hill Road", vec![hill_road()]);
    let search = location_search(&geocoder, 0, Duration::ZERO);

    let older = search.next_ticket();
    let newer = search.next_ticket();

    assert!(!search.is_current(older));
    assert!(search.is_current(newer));
    assert!(search.search_as(older, "Hill Road").await.is_superseded());
    assert_eq!(geocoder.get_call_count("search"), 0);

    let outcome = search.search_as(newer, "Hill Road").await;
    assert_eq!(outcome.into_results().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_sequential_searches_each_settle() {
    let geocoder = MockGeocoder::new();
    geocoder.add_places("Hill Road", vec![hill_road()]);
    let search = location_search(&geocoder, 300, Duration::ZERO);

    let first = search.search("Hill Road").await;
    let second = search.search("Hill Road").await;

    assert!(!first.is_superseded());
    assert!(!second.is_superseded());
    assert_eq!(geocoder.get_call_count("search"), 2);
}

#[tokio::test]
async fn test_provider_failure_degrades_to_empty() {
    let geocoder = MockGeocoder::new();
    geocoder.add_places("Hill Road", vec![hill_road()]);
    geocoder.fail_with_status(503);
    let search = location_search(&geocoder, 0, Duration::from_secs(60));

    let outcome = search.search("Hill Road").await;

    assert_eq!(outcome, SearchOutcome::Results(Vec::new()));
    assert_eq!(search.metrics().degraded_total(), 1);

    // A failure is not cached
    geocoder.recover();
    let outcome = search.search("Hill Road").await;
    assert_eq!(outcome.into_results().unwrap().len(), 1);
    assert_eq!(geocoder.get_call_count("search"), 2);
}

#[tokio::test]
async fn test_blank_query_returns_empty_without_provider_call() {
    let geocoder = MockGeocoder::new();
    let search = location_search(&geocoder, 0, Duration::ZERO);

    let outcome = search.search("   ").await;

    assert_eq!(outcome, SearchOutcome::Results(Vec::new()));
    assert_eq!(geocoder.get_call_count("search"), 0);
}

#[tokio::test]
async fn test_repeated_query_served_from_cache() {
    let geocoder = MockGeocoder::new();
    geocoder.add_places("Hill Road", vec![hill_road()]);
    let search = location_search(&geocoder, 0, Duration::from_secs(60));

    let first = search.search("Hill Road").await;
    let second = search.search("  hill   road ").await;

    assert_eq!(first, second);
    assert_eq!(geocoder.get_call_count("search"), 1);
    assert_eq!(search.metrics().cache_hits_total(), 1);
    assert_eq!(search.metrics().cache_misses_total(), 1);
}

#[tokio::test]
async fn test_zero_ttl_disables_cache() {
    let geocoder = MockGeocoder::new();
    geocoder.add_places("Hill Road", vec![hill_road()]);
    let search = location_search(&geocoder, 0, Duration::ZERO);

    search.search("Hill Road").await;
    search.search("Hill Road").await;

    assert_eq!(geocoder.get_call_count("search"), 2);
    assert_eq!(search.metrics().cache_hits_total(), 0);
}

#[tokio::test]
async fn test_reverse_failure_degrades_to_empty() {
    let geocoder = MockGeocoder::new();
    geocoder.set_reverse_places(vec![hill_road()]);
    geocoder.fail_with_status(500);
    let search = location_search(&geocoder, 0, Duration::ZERO);

    let results = search
        .reverse(address_mcp_server::Coordinates::new(19.05, 72.83))
        .await;

    assert!(results.is_empty());
    assert_eq!(search.metrics().degraded_total(), 1);
}
