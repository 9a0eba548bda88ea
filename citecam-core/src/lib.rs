//! CiteCam Core Library
//!
//! This crate turns scanned ISBN-13 barcodes into APA-style citations. Lookups
//! that fail for lack of connectivity are queued durably and retried later, so
//! no scanned identifier is lost and none produces two citations.

pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod lookup;
pub mod pipeline;
pub mod storage;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{
    CitationError, CiteCamError, IdentifierError, LookupError, Result, StorageError,
};
pub use export::{render_digest, ExportFormat, MailDraft};
pub use format::format_citation;
pub use lookup::{BookLookup, BookMatch, Cover, GoogleBooksClient};
pub use pipeline::{DrainReport, Resolution, ResolutionPipeline, ResolutionState};
pub use storage::{LocalStorage, MemoryStorage, PersistedList, StorageProvider};
pub use store::{CitationStore, PendingQueue};
pub use types::{BibliographicRecord, Citation, Isbn, Notice, NoticeKind, PendingIdentifier};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_from_record() {
        let record = BibliographicRecord::new()
            .with_title("Test Book")
            .with_author("Test Author");
        let citation = Citation::new(format_citation(&record), None).unwrap();
        assert_eq!(citation.display_text(), "Author, T., . Test Book. .");
    }
}
