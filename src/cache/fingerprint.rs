//! Cache key derivation
//!
//! A [`CacheKey`] combines the identity of a document source with a
//! fingerprint of the settings that shape its parse output.
//!
//! # Content hashes are an approximation
//!
//! Byte and text sources are identified by [`ContentHash::Fast`], a 64-bit
//! non-cryptographic hash that is stable within one process run. Two different
//! contents can collide and would then alias the same cache entry. Callers
//! that cannot accept this use the `*_sha256` constructors.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use sha2::{Digest, Sha256};

use crate::document::{DocumentSource, ParseSettings};

/// Identity of a content buffer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentHash {
    /// 64-bit non-cryptographic hash (SipHash, fixed keys)
    Fast(u64),
    /// Hex-encoded SHA-256 digest
    Sha256(String),
}

impl ContentHash {
    pub fn fast(data: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        Self::Fast(hasher.finish())
    }

    pub fn sha256(data: &[u8]) -> Self {
        Self::Sha256(hex::encode(Sha256::digest(data)))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast(h) => write!(f, "{:016x}", h),
            Self::Sha256(digest) => write!(f, "sha256:{}", &digest[..12.min(digest.len())]),
        }
    }
}

/// Minimal identity of a document source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceDescriptor {
    Url(String),
    Bytes(ContentHash),
    Text(ContentHash),
}

impl SourceDescriptor {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Self::Bytes(ContentHash::fast(data))
    }

    pub fn from_text(text: &str) -> Self {
        Self::Text(ContentHash::fast(text.as_bytes()))
    }

    pub fn from_bytes_sha256(data: &[u8]) -> Self {
        Self::Bytes(ContentHash::sha256(data))
    }

    pub fn from_text_sha256(text: &str) -> Self {
        Self::Text(ContentHash::sha256(text.as_bytes()))
    }
}

impl From<&DocumentSource<'_>> for SourceDescriptor {
    fn from(source: &DocumentSource<'_>) -> Self {
        match source {
            DocumentSource::Url(url) => Self::url(*url),
            DocumentSource::Bytes(data) => Self::from_bytes(data),
            DocumentSource::Text(text) => Self::from_text(text),
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "url:{}", url),
            Self::Bytes(hash) => write!(f, "bytes:{}", hash),
            Self::Text(hash) => write!(f, "text:{}", hash),
        }
    }
}

/// Fingerprint of the settings that affect parse output
///
/// Floats are compared by canonical bit pattern: `-0.0` equals `0.0` and all
/// NaNs are equal, every other difference is significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsFingerprint {
    font_size: u32,
    ppi: u32,
    resolver: String,
}

impl SettingsFingerprint {
    pub fn of(settings: &ParseSettings) -> Self {
        Self {
            font_size: canonical_bits(settings.font_size),
            ppi: canonical_bits(settings.ppi),
            resolver: settings.resolver.description(),
        }
    }
}

fn canonical_bits(value: f32) -> u32 {
    if value.is_nan() {
        f32::NAN.to_bits()
    } else if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

/// Opaque cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    source: SourceDescriptor,
    settings: SettingsFingerprint,
}

impl CacheKey {
    pub fn new(source: SourceDescriptor, settings: SettingsFingerprint) -> Self {
        Self { source, settings }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hasher = DefaultHasher::new();
        self.settings.hash(&mut hasher);
        write!(f, "{}@{:08x}", self.source, hasher.finish() as u32)
    }
}

/// Derive the cache key for a source parsed under `settings`
pub fn fingerprint(source: &SourceDescriptor, settings: &ParseSettings) -> CacheKey {
    CacheKey::new(source.clone(), SettingsFingerprint::of(settings))
}
