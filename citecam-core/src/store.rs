//! The two persisted lists: citations and identifiers awaiting retry
//!
//! Both stores mutate memory first and then write the whole list through.
//! A failed write is returned to the caller but the in-memory change stays,
//! because memory is the source of truth for the running session.

use crate::error::{CitationError, Result};
use crate::storage::{PersistedList, StorageProvider};
use crate::types::{Citation, Isbn, PendingIdentifier};
use std::sync::Arc;

/// Storage key of the citation list
pub const CITATIONS_KEY: &str = "citations.json";

/// Storage key of the pending identifier list
pub const PENDING_KEY: &str = "pending.json";

/// Ordered list of citations
pub struct CitationStore {
    citations: Vec<Citation>,
    persisted: PersistedList<Citation>,
}

impl CitationStore {
    /// Load the citation list from storage
    pub async fn load(storage: Arc<dyn StorageProvider>) -> Result<Self> {
        let persisted = PersistedList::new(storage, CITATIONS_KEY);
        let citations = persisted.load().await?;
        tracing::debug!(count = citations.len(), "loaded citations");
        Ok(Self {
            citations,
            persisted,
        })
    }

    pub fn all(&self) -> &[Citation] {
        &self.citations
    }

    pub(crate) fn len(&self) -> usize {
        self.citations.len()
    }

    pub async fn append(&mut self, citation: Citation) -> Result<()> {
        self.citations.push(citation);
        self.persist().await
    }

    /// Replace the citation at `index`, returning the old one
    pub async fn update(&mut self, index: usize, citation: Citation) -> Result<Citation> {
        let len = self.citations.len();
        let slot = self
            .citations
            .get_mut(index)
            .ok_or(CitationError::IndexOutOfRange { index, len })?;
        let previous = std::mem::replace(slot, citation);
        self.persist().await?;
        Ok(previous)
    }

    pub async fn remove(&mut self, index: usize) -> Result<Citation> {
        let len = self.citations.len();
        if index >= len {
            return Err(CitationError::IndexOutOfRange { index, len }.into());
        }
        let removed = self.citations.remove(index);
        self.persist().await?;
        Ok(removed)
    }

    async fn persist(&self) -> Result<()> {
        self.persisted.save(&self.citations).await?;
        Ok(())
    }
}

/// FIFO of identifiers whose lookup failed for lack of connectivity
pub struct PendingQueue {
    entries: Vec<PendingIdentifier>,
    persisted: PersistedList<PendingIdentifier>,
}

impl PendingQueue {
    /// Load the pending list from storage
    pub async fn load(storage: Arc<dyn StorageProvider>) -> Result<Self> {
        let persisted = PersistedList::new(storage, PENDING_KEY);
        let entries = persisted.load().await?;
        tracing::debug!(count = entries.len(), "loaded pending identifiers");
        Ok(Self { entries, persisted })
    }

    pub fn entries(&self) -> &[PendingIdentifier] {
        &self.entries
    }

    pub fn isbns(&self) -> Vec<Isbn> {
        self.entries.iter().map(|e| e.isbn.clone()).collect()
    }

    pub fn contains(&self, isbn: &Isbn) -> bool {
        self.entries.iter().any(|e| &e.isbn == isbn)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue `isbn` at the back; returns false without writing if it is already queued
    pub async fn enqueue(&mut self, isbn: Isbn) -> Result<bool> {
        if self.contains(&isbn) {
            return Ok(false);
        }
        self.entries.push(PendingIdentifier::new(isbn));
        self.persist().await?;
        Ok(true)
    }

    /// Drop `isbn` from the queue; returns false without writing if it was not queued
    pub async fn remove(&mut self, isbn: &Isbn) -> Result<bool> {
        let Some(position) = self.entries.iter().position(|e| &e.isbn == isbn) else {
            return Ok(false);
        };
        self.entries.remove(position);
        self.persist().await?;
        Ok(true)
    }

    async fn persist(&self) -> Result<()> {
        self.persisted.save(&self.entries).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CiteCamError;
    use crate::storage::MemoryStorage;

    fn isbn(raw: &str) -> Isbn {
        Isbn::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_citation_edits_are_written_through() {
        let storage: Arc<dyn StorageProvider> = Arc::new(MemoryStorage::new());
        let mut store = CitationStore::load(storage.clone()).await.unwrap();

        store.append(Citation::new("First.", None).unwrap()).await.unwrap();
        store.append(Citation::new("Second.", None).unwrap()).await.unwrap();
        store
            .update(0, Citation::new("First, edited.", Some(vec![7])).unwrap())
            .await
            .unwrap();
        let removed = store.remove(1).await.unwrap();
        assert_eq!(removed.display_text(), "Second.");

        let reloaded = CitationStore::load(storage).await.unwrap();
        assert_eq!(reloaded.all(), store.all());
        assert_eq!(reloaded.all()[0].display_text(), "First, edited.");
        assert_eq!(reloaded.all()[0].image(), Some(&[7u8][..]));
    }

    #[tokio::test]
    async fn test_out_of_range_edits_do_not_mutate() {
        let mut store = CitationStore::load(Arc::new(MemoryStorage::new()))
            .await
            .unwrap();
        store.append(Citation::new("Only.", None).unwrap()).await.unwrap();

        let err = store.remove(3).await.unwrap_err();
        assert!(matches!(
            err,
            CiteCamError::Citation(CitationError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert!(store
            .update(1, Citation::new("Nope.", None).unwrap())
            .await
            .is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_pending_queue_is_idempotent_fifo() {
        let storage: Arc<dyn StorageProvider> = Arc::new(MemoryStorage::new());
        let mut queue = PendingQueue::load(storage.clone()).await.unwrap();

        assert!(queue.enqueue(isbn("9780000000001")).await.unwrap());
        assert!(queue.enqueue(isbn("9780000000002")).await.unwrap());
        assert!(!queue.enqueue(isbn("9780000000001")).await.unwrap());
        assert_eq!(
            queue.isbns(),
            vec![isbn("9780000000001"), isbn("9780000000002")]
        );

        assert!(queue.remove(&isbn("9780000000001")).await.unwrap());
        assert!(!queue.remove(&isbn("9780000000001")).await.unwrap());

        let reloaded = PendingQueue::load(storage).await.unwrap();
        assert_eq!(reloaded.isbns(), vec![isbn("9780000000002")]);
    }
}
