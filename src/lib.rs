//! Amnesia SVG
//!
//! Memoizes parsed SVG documents so repeated requests for the same logical
//! input skip re-parsing.
//!
//! # Modules
//!
//! - `document`: Parsed document model and the parser collaborator trait
//! - `cache`: Fingerprinting, bounded store, and the shared cache facade

pub mod cache;
pub mod document;

pub use cache::{
    fingerprint, CacheConfig, CacheKey, CacheStats, ContentHash, DocumentCache,
    SettingsFingerprint, SourceDescriptor,
};
pub use document::{
    DocumentError, DocumentParser, DocumentSource, EstimateSize, ParseSettings,
    ReferenceResolver, SvgDocument,
};
