//! Error types for CiteCam Core

use thiserror::Error;

/// Result type alias using CiteCamError
pub type Result<T> = std::result::Result<T, CiteCamError>;

/// Top-level error type for all CiteCam operations
#[derive(Debug, Error)]
pub enum CiteCamError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StorageError),

    #[error("Citation error: {0}")]
    Citation(#[from] CitationError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised while parsing an ISBN-13 before any I/O happens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("expected 13 characters, got {0}")]
    WrongLength(usize),

    #[error("identifier contains non-digit characters")]
    NonNumeric,
}

/// Failure reasons reported by a book lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Upstream answered but knows no book for this identifier
    #[error("no matching book found")]
    NotFound,

    /// The request could not complete; retrying later may succeed
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Upstream answered with something we cannot interpret
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LookupError {
    /// Whether the identifier should be queued for a later attempt
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LookupError::NetworkUnavailable(_))
    }
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by citation construction and list edits
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CitationError {
    #[error("citation text must not be empty")]
    EmptyText,

    #[error("index {index} out of range for {len} citations")]
    IndexOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_failures_are_recoverable() {
        assert!(LookupError::NetworkUnavailable("refused".into()).is_recoverable());
        assert!(!LookupError::NotFound.is_recoverable());
        assert!(!LookupError::MalformedResponse("html".into()).is_recoverable());
    }

    #[test]
    fn wraps_into_top_level_error() {
        let err: CiteCamError = IdentifierError::WrongLength(12).into();
        assert_eq!(
            err.to_string(),
            "Invalid identifier: expected 13 characters, got 12"
        );
    }
}
