//! Bounded memoization with generation-keyed invalidation.
//!
//! Three independent caches back the engine: one per scan strategy and one
//! for parsed expressions. Each is an LRU map behind a mutex, with hit/miss
//! counters maintained under the same lock.
//!
//! Keys embed the generation number that was current when the entry was
//! computed. After an invalidation bumps the counter, lookups build keys
//! with the new generation, so stale entries can never hit again; the
//! eager clear on invalidation only reclaims their storage sooner. That is
//! also what keeps a lookup racing an in-flight invalidation benign: it
//! sees either the old generation or the new one, never a torn mix.
//!
//! Cached values are pure functions of their key, so when two threads miss
//! on the same key concurrently, both compute the same value and the last
//! insert wins.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

/// Entries held by the per-keyword scan cache.
pub const SIMPLE_SCAN_CACHE_CAPACITY: usize = 2048;
/// Entries held by the alternation scan cache.
pub const REGEX_SCAN_CACHE_CAPACITY: usize = 1024;
/// Entries held by the parsed-expression cache.
pub const EXPRESSION_CACHE_CAPACITY: usize = 512;

/// Key for both scan caches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanKey {
    /// Lowercased text body.
    pub text: String,
    /// Sorted, case-folded keywords.
    pub keywords: Vec<String>,
    /// Generation the entry was computed under.
    pub generation: u64,
}

/// Key for the parsed-expression cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprKey {
    /// Whitespace-stripped expression.
    pub expression: String,
    /// Generation the entry was computed under.
    pub generation: u64,
}

/// Point-in-time counters for one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheCounters {
    /// Maximum number of entries before LRU eviction.
    pub capacity: usize,
    /// Entries currently held.
    pub entries: usize,
    /// Lookups answered from the cache since the last clear.
    pub hits: u64,
    /// Lookups that had to compute since the last clear.
    pub misses: u64,
}

/// An LRU map with hit/miss accounting.
///
/// `lookup` and `insert` are deliberately separate so values are computed
/// outside the lock; capacity pressure is absorbed by evicting the
/// least-recently-used entry and is never surfaced to callers.
pub struct BoundedCache<K: Hash + Eq, V: Clone> {
    inner: Mutex<Inner<K, V>>,
    capacity: usize,
}

struct Inner<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        let bound = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner { entries: LruCache::new(bound), hits: 0, misses: 0 }),
            capacity,
        }
    }

    /// Look up `key`, refreshing its recency and counting the hit or miss.
    pub fn lookup(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().unwrap();
        let value = inner.entries.get(key).cloned();
        match value {
            Some(value) => {
                inner.hits += 1;
                Some(value)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store `value` under `key`, evicting the least-recently-used entry at
    /// capacity. Last write wins on a concurrent miss for the same key.
    pub fn insert(&self, key: K, value: V) {
        self.inner.lock().unwrap().entries.put(key, value);
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    pub fn counters(&self) -> CacheCounters {
        let inner = self.inner.lock().unwrap();
        CacheCounters {
            capacity: self.capacity,
            entries: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
        }
    }
}
