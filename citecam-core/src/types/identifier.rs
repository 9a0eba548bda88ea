//! ISBN-13 identifiers

use crate::error::IdentifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of characters in an ISBN-13
pub const ISBN13_LEN: usize = 13;

/// A validated ISBN-13: exactly 13 ASCII digits
///
/// The check digit is not enforced on construction, since barcode scanners
/// only guarantee the length. Use [`Isbn::is_checksum_valid`] to inspect it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Parse a raw identifier, rejecting anything that is not 13 digits
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        if raw.is_empty() {
            return Err(IdentifierError::Empty);
        }

        let len = raw.chars().count();
        if len != ISBN13_LEN {
            return Err(IdentifierError::WrongLength(len));
        }

        if !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdentifierError::NonNumeric);
        }

        Ok(Self(raw.to_string()))
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the trailing check digit matches the ISBN-13 weighting (1, 3, 1, 3, ...)
    pub fn is_checksum_valid(&self) -> bool {
        let sum: u32 = self
            .0
            .bytes()
            .enumerate()
            .map(|(i, b)| {
                let value = u32::from(b - b'0');
                if i % 2 == 0 {
                    value
                } else {
                    value * 3
                }
            })
            .sum();

        sum % 10 == 0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Isbn {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Isbn {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_thirteen_digits() {
        let isbn = Isbn::parse("9780321125217").unwrap();
        assert_eq!(isbn.as_str(), "9780321125217");
        assert!(isbn.is_checksum_valid());
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(Isbn::parse(""), Err(IdentifierError::Empty));
        assert_eq!(
            Isbn::parse("978032112521"),
            Err(IdentifierError::WrongLength(12))
        );
        assert_eq!(
            Isbn::parse("978-0-321-12521-7"),
            Err(IdentifierError::WrongLength(17))
        );
        assert_eq!(
            Isbn::parse("978032112521X"),
            Err(IdentifierError::NonNumeric)
        );
        // No trimming: the scanner hands us exact strings
        assert!(Isbn::parse(" 978032112521").is_err());
    }

    #[test]
    fn test_checksum() {
        assert!(!Isbn::parse("9780321125218").unwrap().is_checksum_valid());
    }

    #[test]
    fn test_serde_rejects_bad_identifiers() {
        let ok: Isbn = serde_json::from_str("\"9780306406157\"").unwrap();
        assert_eq!(ok.to_string(), "9780306406157");
        assert!(serde_json::from_str::<Isbn>("\"12345\"").is_err());
    }

    proptest! {
        #[test]
        fn any_thirteen_digits_parse(raw in "[0-9]{13}") {
            let isbn = Isbn::parse(&raw).unwrap();
            prop_assert_eq!(isbn.as_str(), raw.as_str());
        }

        #[test]
        fn other_lengths_are_rejected(raw in "[0-9]{0,12}|[0-9]{14,20}") {
            prop_assert!(Isbn::parse(&raw).is_err());
        }
    }
}
