//! Book metadata lookups

mod google_books;

pub use google_books::{parse_volumes_response, GoogleBooksClient, GOOGLE_BOOKS_VOLUMES_URL};

use crate::error::LookupError;
use crate::types::{BibliographicRecord, Isbn};
use async_trait::async_trait;

/// Stock cover used when a book has no thumbnail or it cannot be fetched
pub const PLACEHOLDER_COVER: &[u8] = include_bytes!("../../assets/placeholder.png");

/// Cover image attached to a successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cover {
    /// Bytes downloaded from the record's cover reference
    Fetched(Vec<u8>),

    /// The bundled stock image
    Placeholder,
}

impl Cover {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Cover::Placeholder)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Cover::Fetched(bytes) => bytes,
            Cover::Placeholder => PLACEHOLDER_COVER.to_vec(),
        }
    }
}

/// A resolved book: its metadata plus a cover image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMatch {
    pub record: BibliographicRecord,
    pub cover: Cover,
}

impl BookMatch {
    pub fn new(record: BibliographicRecord, cover: Cover) -> Self {
        Self { record, cover }
    }
}

/// A remote source that resolves an ISBN to book metadata
#[async_trait]
pub trait BookLookup: Send + Sync {
    /// Issue one query for `isbn`
    ///
    /// Implementations convert every transport or decoding failure into a
    /// [`LookupError`]; a missing or unreachable cover must not fail the lookup.
    async fn lookup(&self, isbn: &Isbn) -> Result<BookMatch, LookupError>;
}
