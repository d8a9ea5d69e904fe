//! Aggregate caching for search.
//!
//! Provides an LRU cache of per-category aggregated term codes. The taxonomy
//! is immutable once built, so an entry stays valid for as long as the
//! engine lives. Thread-safe using `Mutex` for LRU operations.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use lru::LruCache;
use tracing::trace;

use crate::config::CacheConfig;

/// Thread-safe LRU cache mapping category ids to aggregated term codes.
///
/// # Example
///
/// ```ignore
/// use facet_search::{AggregateCache, CacheConfig};
///
/// let cache = AggregateCache::new(CacheConfig::default());
/// cache.set("1003".to_string(), vec!["T1".to_string()]);
/// assert_eq!(cache.get("1003"), Some(vec!["T1".to_string()]));
/// ```
pub struct AggregateCache {
    /// The LRU cache wrapped in a mutex for thread-safety.
    inner: Mutex<LruCache<String, Vec<String>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl AggregateCache {
    /// Creates a new cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_capacity(config.max_entries)
    }

    /// Creates a cache holding at most `max_entries` categories.
    pub fn with_capacity(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Gets the cached term codes for a category id.
    ///
    /// On a hit the entry is promoted to most-recently-used.
    pub fn get(&self, category_id: &str) -> Option<Vec<String>> {
        let mut cache = self.inner.lock().ok()?;
        match cache.get(category_id) {
            Some(codes) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(category_id, "aggregate cache hit");
                Some(codes.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Stores the aggregated term codes for a category id.
    ///
    /// If the cache is full, the least recently used entry is evicted.
    pub fn set(&self, category_id: String, codes: Vec<String>) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.put(category_id, codes);
        }
    }

    /// Checks if a category is cached (without affecting LRU order).
    pub fn contains(&self, category_id: &str) -> bool {
        match self.inner.lock() {
            Ok(cache) => cache.contains(category_id),
            _ => false,
        }
    }

    /// Returns the number of cached categories.
    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(cache) => cache.len(),
            _ => 0,
        }
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all entries and counters.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.clear();
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let (entries, capacity) = match self.inner.lock() {
            Ok(cache) => (cache.len(), cache.cap().get()),
            _ => (0, 0),
        };
        CacheStats {
            entries,
            capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for AggregateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("AggregateCache")
            .field("entries", &stats.entries)
            .field("capacity", &stats.capacity)
            .field("hits", &stats.hits)
            .field("misses", &stats.misses)
            .finish()
    }
}

/// Statistics about the cache state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached categories.
    pub entries: usize,
    /// Maximum number of cached categories.
    pub capacity: usize,
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that missed.
    pub misses: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, 0.0 when unused.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
