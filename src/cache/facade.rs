//! Shared document cache
//!
//! `DocumentCache` binds fingerprinting to the store and serializes every
//! store operation behind one `parking_lot::Mutex`. Lookups move entries in
//! the recency order, so there is no read-only path that could use a shared
//! lock.
//!
//! Entries the store takes out are dropped only after the guard is released,
//! so a large document's destructor never runs inside the critical section.
//!
//! # Usage
//!
//! ```rust,ignore
//! use amnesia_svg::{DocumentCache, DocumentSource, ParseSettings};
//!
//! let cache = DocumentCache::global();
//! let source = DocumentSource::Text(markup);
//! let doc = cache.get_or_parse(&source, &ParseSettings::default(), &parser)?;
//! ```

use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use super::config::CacheConfig;
use super::fingerprint::{fingerprint, CacheKey, SourceDescriptor};
use super::stats::CacheStats;
use super::store::CacheStore;
use crate::document::{DocumentParser, DocumentSource, EstimateSize, ParseSettings, SvgDocument};

static GLOBAL_CACHE: LazyLock<DocumentCache<SvgDocument>> =
    LazyLock::new(|| DocumentCache::new(CacheConfig::from_env()));

/// Thread-safe parsed-document cache
///
/// Cloning is cheap and clones share the same store.
pub struct DocumentCache<D = SvgDocument> {
    store: Arc<Mutex<CacheStore<D>>>,
}

impl<D> Clone for DocumentCache<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<D> Default for DocumentCache<D> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl DocumentCache<SvgDocument> {
    /// Process-wide cache
    ///
    /// Created on first use from `CacheConfig::from_env()` and kept for the
    /// life of the process. Tests and embedders that need isolation should
    /// build their own instance with `DocumentCache::new`.
    pub fn global() -> &'static DocumentCache<SvgDocument> {
        &GLOBAL_CACHE
    }
}

impl<D> DocumentCache<D> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new(config))),
        }
    }

    /// Look up the document parsed from `source` under `settings`
    pub fn get(&self, source: &SourceDescriptor, settings: &ParseSettings) -> Option<Arc<D>> {
        self.get_key(&fingerprint(source, settings))
    }

    pub fn get_key(&self, key: &CacheKey) -> Option<Arc<D>> {
        let (document, expired) = self.store.lock().get(key);
        drop(expired);
        document
    }

    /// Store a document under an explicit key and size hint
    pub fn put_key(&self, key: CacheKey, document: Arc<D>, size_hint: u64) {
        let evicted = self.store.lock().put(key, document, size_hint);
        drop(evicted);
    }

    pub fn remove(&self, source: &SourceDescriptor, settings: &ParseSettings) -> bool {
        let key = fingerprint(source, settings);
        let removed = self.store.lock().remove(&key);
        removed.is_some()
    }

    /// Whether a live entry exists, without affecting recency
    pub fn contains(&self, source: &SourceDescriptor, settings: &ParseSettings) -> bool {
        self.store.lock().contains(&fingerprint(source, settings))
    }

    pub fn clear(&self) {
        let removed = self.store.lock().clear();
        drop(removed);
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    /// Current policy
    pub fn config(&self) -> CacheConfig {
        self.store.lock().config().clone()
    }

    /// Replace the policy; see `CacheStore::set_config`
    pub fn set_config(&self, config: CacheConfig) {
        let evicted = self.store.lock().set_config(config);
        drop(evicted);
    }

    /// Drop expired entries now instead of waiting for the next `put`;
    /// returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        let expired = self.store.lock().purge_expired();
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}

impl<D: EstimateSize> DocumentCache<D> {
    /// Store a parsed document, sized by its structural estimate
    ///
    /// Returns the shared handle that was cached.
    pub fn put(
        &self,
        document: impl Into<Arc<D>>,
        source: &SourceDescriptor,
        settings: &ParseSettings,
    ) -> Arc<D> {
        let document = document.into();
        // Estimate before locking; large trees take a while to walk.
        let size = document.estimated_size();
        self.put_key(fingerprint(source, settings), Arc::clone(&document), size);
        document
    }

    /// Return the cached document or parse and cache it
    ///
    /// The parser runs without the lock held, so concurrent callers missing
    /// on the same key may each parse; the last one to finish wins the slot.
    /// Parse errors are returned as-is and nothing is cached for them.
    pub fn get_or_parse<P>(
        &self,
        source: &DocumentSource<'_>,
        settings: &ParseSettings,
        parser: &P,
    ) -> Result<Arc<D>, P::Error>
    where
        P: DocumentParser<D>,
    {
        let descriptor = SourceDescriptor::from(source);
        let key = fingerprint(&descriptor, settings);
        if let Some(document) = self.get_key(&key) {
            return Ok(document);
        }

        tracing::debug!(key = %key, source = source.kind(), "Parsing document");
        let document = Arc::new(parser.parse(source, settings)?);
        let size = document.estimated_size();
        self.put_key(key, Arc::clone(&document), size);
        Ok(document)
    }
}
