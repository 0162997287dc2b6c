//! Time-bounded cache of geocoding results keyed by query text.
//!
//! Queries that differ only in case or whitespace share an entry. Entries expire
//! after the configured TTL, and the cache holds at most `capacity` entries,
//! evicting the oldest insertion first.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Default number of distinct queries kept.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// A thread-safe search result cache with time-based expiration.
///
/// Cloning is cheap and clones share the same storage. A TTL of zero disables
/// the cache: inserts are dropped and lookups always miss.
#[derive(Clone)]
pub struct SearchCache<V: Clone> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    ttl: Duration,
    capacity: usize,
}

impl<V: Clone> SearchCache<V> {
    /// Create a cache with the given TTL and the default capacity.
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Canonical cache key: lowercase with whitespace runs collapsed.
    pub fn normalize_key(query: &str) -> String {
        query
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Get a cached value if present and not expired.
    pub fn get(&self, query: &str) -> Option<V> {
        if !self.is_enabled() {
            return None;
        }

        let key = Self::normalize_key(query);
        let entries = self.entries.read().ok()?;
        entries
            .get(&key)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Store a value, evicting expired entries and then the oldest if full.
    pub fn insert(&self, query: &str, value: V) {
        if !self.is_enabled() {
            return;
        }

        let key = Self::normalize_key(query);
        if let Ok(mut entries) = self.entries.write() {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);

            if entries.len() >= self.capacity && !entries.contains_key(&key) {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                }
            }

            entries.insert(
                key,
                CacheEntry {
                    value,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<V: Clone> std::fmt::Debug for SearchCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .field("entries", &self.len())
            .finish()
    }
}
