//! Caching implementations for geocoding results.

pub mod search_cache;

pub use search_cache::SearchCache;
