//! Parsed SVG document model
//!
//! The cache treats documents as opaque, shared values. This module holds the
//! document tree handed out by the cache, the settings snapshot that shapes a
//! parse, and the parser collaborator trait that callers implement.
//!
//! ```text
//! ┌──────────────┐  DocumentSource   ┌────────────────┐
//! │    caller    │ ────────────────▶ │ DocumentParser │
//! │              │ ◀──────────────── │  (external)    │
//! └──────────────┘    SvgDocument    └────────────────┘
//!        │
//!        ▼  Arc<SvgDocument>
//! ┌──────────────┐
//! │ DocumentCache│
//! └──────────────┘
//! ```

mod error;
mod traits;
mod types;

pub use error::{DocumentError, Result};
pub use traits::{DocumentParser, EstimateSize};
pub use types::{
    Attribute, DocumentSource, Node, ParseSettings, ReferenceResolver, SvgDocument, ViewBox,
};
