//! Document error types
//!
//! Errors raised by parser collaborators. The cache itself never fails; it
//! only passes these through from `DocumentCache::get_or_parse`.

use thiserror::Error;

/// Document error type
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to parse document
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid content (encoding, malformed markup)
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// A cross-reference (`href`, `url(#id)`) could not be resolved
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    /// The parser does not accept this kind of source
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DocumentError::UnresolvedReference("#gradient-1".to_string());
        assert_eq!(err.to_string(), "Unresolved reference: #gradient-1");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.svg");
        let err: DocumentError = io.into();
        assert!(matches!(err, DocumentError::Io(_)));
    }
}
