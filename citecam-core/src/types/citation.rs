//! Citations and the identifiers waiting to become one

use super::Isbn;
use crate::error::CitationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A formatted citation with an optional photo (usually the book cover)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "StoredCitation")]
pub struct Citation {
    id: Uuid,

    display_text: String,

    #[serde(with = "base64_serde")]
    image: Option<Vec<u8>>,

    isbn: Option<Isbn>,

    created_at: DateTime<Utc>,
}

impl Citation {
    /// Create a citation; fails when the text is empty or only whitespace
    pub fn new(
        display_text: impl Into<String>,
        image: Option<Vec<u8>>,
    ) -> Result<Self, CitationError> {
        let display_text = display_text.into();
        if display_text.trim().is_empty() {
            return Err(CitationError::EmptyText);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            display_text,
            image,
            isbn: None,
            created_at: Utc::now(),
        })
    }

    /// Record the identifier this citation was resolved from
    pub fn with_isbn(mut self, isbn: Isbn) -> Self {
        self.isbn = Some(isbn);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn image(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }

    pub fn isbn(&self) -> Option<&Isbn> {
        self.isbn.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the text, keeping identity and photo
    pub fn set_display_text(&mut self, text: impl Into<String>) -> Result<(), CitationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CitationError::EmptyText);
        }
        self.display_text = text;
        Ok(())
    }

    /// Replace or clear the photo
    pub fn set_image(&mut self, image: Option<Vec<u8>>) {
        self.image = image;
    }
}

/// On-disk shape, validated on the way back in
#[derive(Deserialize)]
struct StoredCitation {
    id: Uuid,
    display_text: String,
    #[serde(with = "base64_serde", default)]
    image: Option<Vec<u8>>,
    isbn: Option<Isbn>,
    created_at: DateTime<Utc>,
}

impl TryFrom<StoredCitation> for Citation {
    type Error = CitationError;

    fn try_from(stored: StoredCitation) -> Result<Self, Self::Error> {
        if stored.display_text.trim().is_empty() {
            return Err(CitationError::EmptyText);
        }

        Ok(Self {
            id: stored.id,
            display_text: stored.display_text,
            image: stored.image,
            isbn: stored.isbn,
            created_at: stored.created_at,
        })
    }
}

/// An identifier whose lookup failed for lack of connectivity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingIdentifier {
    pub isbn: Isbn,

    /// When the identifier first entered the queue
    pub queued_at: DateTime<Utc>,
}

impl PendingIdentifier {
    pub fn new(isbn: Isbn) -> Self {
        Self {
            isbn,
            queued_at: Utc::now(),
        }
    }
}

/// Base64 serialization for optional binary data
mod base64_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match data {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Option::<String>::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_fails_construction() {
        assert_eq!(Citation::new("", None), Err(CitationError::EmptyText));
        assert_eq!(Citation::new("   ", None), Err(CitationError::EmptyText));
    }

    #[test]
    fn test_serialization_keeps_image_bytes() {
        let citation = Citation::new("Doe, J., (1999). A Book. Press.", Some(vec![0, 159, 255]))
            .unwrap()
            .with_isbn(Isbn::parse("9780306406157").unwrap());

        let json = serde_json::to_string(&citation).unwrap();
        let restored: Citation = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, citation);
        assert_eq!(restored.image(), Some(&[0u8, 159, 255][..]));
    }

    #[test]
    fn test_deserializing_blank_text_fails() {
        let json = r#"{
            "id": "12345678-1234-1234-1234-123456789abc",
            "display_text": "",
            "image": null,
            "isbn": null,
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Citation>(json).is_err());
    }

    #[test]
    fn test_edits_validate_text() {
        let mut citation = Citation::new("Original.", None).unwrap();
        let id = citation.id();

        assert_eq!(citation.set_display_text(""), Err(CitationError::EmptyText));
        assert_eq!(citation.display_text(), "Original.");

        citation.set_display_text("Edited.").unwrap();
        citation.set_image(Some(vec![1, 2, 3]));
        assert_eq!(citation.display_text(), "Edited.");
        assert_eq!(citation.image(), Some(&[1u8, 2, 3][..]));
        assert_eq!(citation.id(), id);
    }
}
