//! Bounded document store
//!
//! Key → entry table with recency tracking and byte accounting. Not
//! synchronized on its own; `DocumentCache` wraps it in a single mutex because
//! every operation, lookups included, mutates recency or counters.
//!
//! Methods that take entries out hand them back as [`Evicted`] instead of
//! dropping them. Dropping the last `Arc` to a large document can run a long
//! destructor, and the caller decides where that happens (the facade does it
//! after releasing its lock).
//!
//! Invariants held after every public method returns:
//! - the LRU order and the key set are one structure (`LruCache`), so they
//!   can never disagree
//! - `total_bytes` equals the exact sum of `approx_size_bytes` over live
//!   entries
//! - while enabled, `len() <= max_entries` and `total_bytes <= max_total_bytes`
//!   as of the last `put` or `set_config`

use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::{debug, info};

use super::config::CacheConfig;
use super::fingerprint::CacheKey;
use super::stats::CacheStats;

/// Entries removed by a store operation, oldest removal first
pub type Evicted<D> = Vec<CacheEntry<D>>;

/// A cached document with its bookkeeping
#[derive(Debug)]
pub struct CacheEntry<D> {
    /// Shared handle; callers keep theirs after the store drops its own
    pub document: Arc<D>,
    /// When the entry was inserted or last overwritten
    pub inserted_at: Instant,
    /// Caller-supplied size estimate
    pub approx_size_bytes: u64,
}

impl<D> CacheEntry<D> {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) > ttl
    }
}

/// Why an entry left the store during an eviction pass
#[derive(Debug, Clone, Copy)]
enum EvictionReason {
    Expired,
    Count,
    Bytes,
}

impl EvictionReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Count => "count",
            Self::Bytes => "bytes",
        }
    }
}

/// LRU + TTL + byte-budget store
pub struct CacheStore<D> {
    entries: LruCache<CacheKey, CacheEntry<D>>,
    /// Wider than any single hint so the sum of live entries never saturates
    total_bytes: u128,
    config: CacheConfig,
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
}

impl<D> CacheStore<D> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: LruCache::unbounded(),
            total_bytes: 0,
            config: config.normalized(),
            hits: 0,
            misses: 0,
            evictions: 0,
            expirations: 0,
        }
    }

    /// Look up a document, promoting it to most-recently-used on a hit
    ///
    /// An entry found expired is removed and returned alongside the miss.
    pub fn get(&mut self, key: &CacheKey) -> (Option<Arc<D>>, Evicted<D>) {
        self.get_at(key, Instant::now())
    }

    /// Insert or overwrite an entry, then run the eviction pass
    ///
    /// Returns the replaced entry, if any, and everything the pass evicted.
    pub fn put(&mut self, key: CacheKey, document: Arc<D>, size_hint: u64) -> Evicted<D> {
        self.put_at(key, document, size_hint, Instant::now())
    }

    /// Replace the policy
    ///
    /// A disabled policy empties the store. An enabled one is enforced right
    /// away rather than on the next `put`.
    pub fn set_config(&mut self, config: CacheConfig) -> Evicted<D> {
        self.set_config_at(config, Instant::now())
    }

    /// Take out every entry whose TTL has elapsed
    pub fn purge_expired(&mut self) -> Evicted<D> {
        let mut removed = Vec::new();
        self.sweep_expired(Instant::now(), &mut removed);
        removed
    }

    /// Whether a live entry exists for `key`, without touching recency
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.contains_at(key, Instant::now())
    }

    /// Take out one entry
    pub fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry<D>> {
        let entry = self.take(key)?;
        debug!(key = %key, "Removed cache entry");
        Some(entry)
    }

    /// Take out all entries. Works whether or not the cache is enabled.
    pub fn clear(&mut self) -> Evicted<D> {
        let mut removed = Vec::with_capacity(self.entries.len());
        while let Some((_, entry)) = self.entries.pop_lru() {
            removed.push(entry);
        }
        self.total_bytes = 0;
        if !removed.is_empty() {
            info!(entries = removed.len(), "Cleared document cache");
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            item_count: self.entries.len(),
            // Never above max_total_bytes once a public method returns.
            total_bytes: u64::try_from(self.total_bytes).unwrap_or(u64::MAX),
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            expirations: self.expirations,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get_at(&mut self, key: &CacheKey, now: Instant) -> (Option<Arc<D>>, Evicted<D>) {
        if !self.config.enabled {
            return (None, Vec::new());
        }

        // Peek first so an expired entry is not promoted before removal.
        let expired = match self.entries.peek(key) {
            Some(entry) => entry.is_expired(now, self.config.ttl),
            None => {
                self.misses += 1;
                debug!(key = %key, "Cache miss");
                return (None, Vec::new());
            }
        };

        if expired {
            let removed = self.take(key).into_iter().collect();
            self.expirations += 1;
            self.misses += 1;
            debug!(key = %key, "Cache entry expired, removing");
            return (None, removed);
        }

        let document = self.entries.get(key).map(|e| Arc::clone(&e.document));
        if document.is_some() {
            self.hits += 1;
            debug!(key = %key, "Cache hit");
        }
        (document, Vec::new())
    }

    pub(crate) fn put_at(
        &mut self,
        key: CacheKey,
        document: Arc<D>,
        size_hint: u64,
        now: Instant,
    ) -> Evicted<D> {
        let mut removed = Vec::new();
        if !self.config.enabled {
            return removed;
        }

        let entry = CacheEntry {
            document,
            inserted_at: now,
            approx_size_bytes: size_hint,
        };
        debug!(key = %key, size = size_hint, "Caching document");
        if let Some(old) = self.entries.put(key, entry) {
            self.total_bytes -= u128::from(old.approx_size_bytes);
            removed.push(old);
        }
        self.total_bytes += u128::from(size_hint);

        self.evict(now, &mut removed);
        removed
    }

    pub(crate) fn set_config_at(&mut self, config: CacheConfig, now: Instant) -> Evicted<D> {
        let config = config.normalized();
        info!(
            enabled = config.enabled,
            max_entries = config.max_entries,
            max_total_bytes = config.max_total_bytes,
            ttl_secs = config.ttl.as_secs_f64(),
            "Replacing document cache policy"
        );
        self.config = config;
        if self.config.enabled {
            let mut removed = Vec::new();
            self.evict(now, &mut removed);
            removed
        } else {
            self.clear()
        }
    }

    pub(crate) fn contains_at(&self, key: &CacheKey, now: Instant) -> bool {
        self.config.enabled
            && self
                .entries
                .peek(key)
                .is_some_and(|e| !e.is_expired(now, self.config.ttl))
    }

    /// Eviction pass: expiry sweep, then count cap, then byte cap
    fn evict(&mut self, now: Instant, removed: &mut Evicted<D>) {
        self.sweep_expired(now, removed);

        while self.entries.len() > self.config.max_entries {
            if !self.evict_lru(EvictionReason::Count, removed) {
                break;
            }
        }

        let max_total_bytes = u128::from(self.config.max_total_bytes);
        while self.total_bytes > max_total_bytes {
            if !self.evict_lru(EvictionReason::Bytes, removed) {
                break;
            }
        }
    }

    fn sweep_expired(&mut self, now: Instant, removed: &mut Evicted<D>) {
        let ttl = self.config.ttl;
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(now, ttl))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            if let Some(entry) = self.take(key) {
                self.expirations += 1;
                debug!(key = %key, reason = EvictionReason::Expired.as_str(), "Evicting cache entry");
                removed.push(entry);
            }
        }
    }

    fn evict_lru(&mut self, reason: EvictionReason, removed: &mut Evicted<D>) -> bool {
        let Some((key, entry)) = self.entries.pop_lru() else {
            return false;
        };
        self.total_bytes -= u128::from(entry.approx_size_bytes);
        self.evictions += 1;
        debug!(
            key = %key,
            size = entry.approx_size_bytes,
            reason = reason.as_str(),
            "Evicting cache entry"
        );
        removed.push(entry);
        true
    }

    fn take(&mut self, key: &CacheKey) -> Option<CacheEntry<D>> {
        let entry = self.entries.pop(key)?;
        self.total_bytes -= u128::from(entry.approx_size_bytes);
        Some(entry)
    }
}

impl<D> Default for CacheStore<D> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
