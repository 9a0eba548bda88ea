//! User-facing notices emitted by the pipeline

use super::Isbn;
use serde::{Deserialize, Serialize};

/// What a notice reports, so the UI can style it and tests can match on it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A citation was generated
    Success,

    /// The lookup could not reach the network; the identifier was queued
    OfflineQueued,

    /// Upstream has no book for the identifier
    NotFound,

    /// Upstream answered with something unusable
    LookupFailed,

    /// Queued identifiers were all translated
    BacklogCleared,

    /// No mail recipient is configured
    EmailUnavailable,

    /// A list could not be written to storage
    PersistenceFailure,
}

impl NoticeKind {
    /// Whether the notice reports a problem
    pub fn is_error(self) -> bool {
        !matches!(self, NoticeKind::Success | NoticeKind::BacklogCleared)
    }
}

/// A (kind, title, message) triple for the UI layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Carries the generated citation text as the message
    pub fn success(citation_text: &str) -> Self {
        Self::new(NoticeKind::Success, "Citation Generated!", citation_text)
    }

    pub fn offline_queued(isbn: &Isbn) -> Self {
        Self::new(
            NoticeKind::OfflineQueued,
            "No Internet!",
            format!(
                "Unable to generate a citation for {isbn} without internet access. \
                 The ISBN was saved and will be retried later."
            ),
        )
    }

    pub fn not_found(isbn: &Isbn) -> Self {
        Self::new(
            NoticeKind::NotFound,
            "Generator failed!",
            format!("Unable to generate a citation for {isbn}. No book information exists for it."),
        )
    }

    pub fn lookup_failed(isbn: &Isbn, reason: &str) -> Self {
        Self::new(
            NoticeKind::LookupFailed,
            "Generator failed!",
            format!("Unable to generate a citation for {isbn}: {reason}"),
        )
    }

    pub fn backlog_cleared(count: usize) -> Self {
        Self::new(
            NoticeKind::BacklogCleared,
            "Offline ISBNs Translated!",
            format!("All {count} ISBNs stored during the internet outage were converted to citations."),
        )
    }

    pub fn email_unavailable() -> Self {
        Self::new(
            NoticeKind::EmailUnavailable,
            "Unable to Email!",
            "Could not prepare an email. Is a mail recipient configured?",
        )
    }

    pub fn persistence_failure(what: &str, reason: &str) -> Self {
        Self::new(
            NoticeKind::PersistenceFailure,
            "Save failed!",
            format!("Could not save {what}: {reason}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinguishable() {
        let isbn = Isbn::parse("9780306406157").unwrap();
        let notices = [
            Notice::success("Doe, J., (2000). Title. Pub."),
            Notice::offline_queued(&isbn),
            Notice::not_found(&isbn),
            Notice::email_unavailable(),
        ];

        let kinds: std::collections::HashSet<_> = notices.iter().map(|n| n.kind).collect();
        assert_eq!(kinds.len(), notices.len());
        assert_eq!(notices[0].message, "Doe, J., (2000). Title. Pub.");
        assert!(!notices[0].kind.is_error());
        assert!(notices[1].kind.is_error());
    }
}
