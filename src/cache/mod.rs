//! Parsed document cache
//!
//! Memoizes parser output keyed by source identity plus the settings that
//! shape the parse.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    DocumentCache                        │
//! │      (Arc<Mutex<..>>, process-wide via global())        │
//! └─────────────────────────────────────────────────────────┘
//!          │ fingerprint()               │ lock()
//!          ▼                             ▼
//!   ┌──────────────┐         ┌─────────────────────────────┐
//!   │   CacheKey   │ ──────▶ │         CacheStore          │
//!   │ source+prefs │         │ LruCache + byte total + TTL │
//!   └──────────────┘         └─────────────────────────────┘
//!                                        │ after every put
//!                                        ▼
//!                      expiry sweep → count cap → byte cap
//! ```
//!
//! # Thread Safety
//!
//! One `parking_lot::Mutex` guards the store. Parsing and size estimation
//! happen outside it; documents are shared as `Arc<D>`.

mod config;
mod facade;
mod fingerprint;
mod stats;
mod store;

pub use config::{CacheConfig, DEFAULT_MAX_ENTRIES, DEFAULT_MAX_TOTAL_BYTES, DEFAULT_TTL_SECS};
pub use facade::DocumentCache;
pub use fingerprint::{fingerprint, CacheKey, ContentHash, SettingsFingerprint, SourceDescriptor};
pub use stats::CacheStats;
pub use store::{CacheEntry, CacheStore, Evicted};
