//! Bibliographic metadata returned by a lookup

use serde::{Deserialize, Serialize};

/// Book metadata as reported upstream; every field may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BibliographicRecord {
    /// Book title
    pub title: Option<String>,

    /// Authors in credit order, each as "First [Middle] Last"
    pub authors: Vec<String>,

    /// Publisher name
    pub publisher: Option<String>,

    /// Publication year; may still carry month and day as "YYYY-MM-DD"
    pub published_year: Option<String>,

    /// URL of a cover thumbnail
    pub cover_image_ref: Option<String>,
}

impl BibliographicRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add an author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// Set publisher
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Set publication year or date
    pub fn with_published_year(mut self, year: impl Into<String>) -> Self {
        self.published_year = Some(year.into());
        self
    }

    /// Set cover image URL
    pub fn with_cover_image_ref(mut self, url: impl Into<String>) -> Self {
        self.cover_image_ref = Some(url.into());
        self
    }
}

/// Pull the four-digit year out of a date whose parts are separated by `-`
///
/// Returns the last component that is exactly four ASCII digits.
pub fn extract_year(date: &str) -> Option<&str> {
    date.split('-')
        .map(str::trim)
        .filter(|part| part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit()))
        .last()
}
