//! Offline-resilient ISBN resolution
//!
//! Each identifier moves through `Submitted -> Resolving -> {Resolved | Queued | Rejected}`,
//! and queued identifiers go back to `Resolving` when the backlog is drained.
//!
//! One mutex guards the citation store, the pending queue and the set of
//! identifiers currently being resolved. It is taken to claim an identifier
//! and again to commit the outcome, never across the remote call, so lookups
//! for different identifiers overlap while every state transition is
//! serialized. A claimed identifier is never claimed twice, which keeps a
//! scan racing a drain from producing two citations for one ISBN.

use crate::error::{CitationError, CiteCamError, LookupError, Result};
use crate::format::format_citation;
use crate::lookup::{BookLookup, BookMatch};
use crate::storage::StorageProvider;
use crate::store::{CitationStore, PendingQueue};
use crate::types::{Citation, Isbn, Notice, PendingIdentifier};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

/// Default bound on a single lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

const NOTICE_CHANNEL_CAPACITY: usize = 100;

/// Where an identifier currently sits in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// A lookup for it is in flight
    Resolving,

    /// Waiting in the pending queue for a later drain
    Queued,
}

/// Outcome of one submission
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A citation was created and stored
    Resolved(Citation),

    /// The network was unavailable; `newly_queued` is false when it was already pending
    Queued { newly_queued: bool },

    /// Upstream cannot resolve this identifier; retrying will not help
    Rejected(LookupError),

    /// Another submission or drain is resolving this identifier right now
    AlreadyResolving,
}

/// Summary of one drain pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Identifiers turned into citations, in queue order
    pub resolved: Vec<Isbn>,

    /// Identifiers dropped because upstream cannot resolve them
    pub rejected: Vec<Isbn>,

    /// Queue length after the pass
    pub remaining: usize,

    /// The pass stopped early because the network was still unavailable
    pub stopped_offline: bool,
}

impl DrainReport {
    /// Number of identifiers whose lookup completed with a final answer
    pub fn settled(&self) -> usize {
        self.resolved.len() + self.rejected.len()
    }
}

struct PipelineState {
    citations: CitationStore,
    pending: PendingQueue,
    resolving: HashSet<Isbn>,
}

/// Orchestrates lookups, citation creation and the offline backlog
pub struct ResolutionPipeline {
    lookup: Arc<dyn BookLookup>,
    state: Mutex<PipelineState>,
    drain_lock: Mutex<()>,
    lookup_timeout: Duration,
    notices: broadcast::Sender<Notice>,
}

impl ResolutionPipeline {
    /// Create a pipeline over already-loaded stores
    pub fn new(lookup: Arc<dyn BookLookup>, citations: CitationStore, pending: PendingQueue) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self {
            lookup,
            state: Mutex::new(PipelineState {
                citations,
                pending,
                resolving: HashSet::new(),
            }),
            drain_lock: Mutex::new(()),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            notices,
        }
    }

    /// Load both lists from `storage` and create a pipeline over them
    pub async fn open(lookup: Arc<dyn BookLookup>, storage: Arc<dyn StorageProvider>) -> Result<Self> {
        let citations = CitationStore::load(storage.clone()).await?;
        let pending = PendingQueue::load(storage).await?;
        Ok(Self::new(lookup, citations, pending))
    }

    /// Bound every whole lookup, cover download included; expiry is treated as a network failure
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Subscribe to user-facing notices
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Validate `raw` and resolve it
    ///
    /// Malformed identifiers fail with [`CiteCamError::InvalidIdentifier`]
    /// before any I/O.
    pub async fn submit(&self, raw: &str) -> Result<Resolution> {
        let isbn = Isbn::parse(raw)?;
        Ok(self.submit_isbn(isbn).await)
    }

    /// Resolve an already-validated identifier
    pub async fn submit_isbn(&self, isbn: Isbn) -> Resolution {
        if !isbn.is_checksum_valid() {
            tracing::warn!(%isbn, "ISBN check digit does not match, resolving anyway");
        }

        {
            let mut state = self.state.lock().await;
            if !state.resolving.insert(isbn.clone()) {
                tracing::debug!(%isbn, "already resolving, ignoring submission");
                return Resolution::AlreadyResolving;
            }
            tracing::debug!(%isbn, queued = state.pending.contains(&isbn), "claimed for resolution");
        }

        let outcome = self.attempt(&isbn).await;
        self.commit(&isbn, outcome).await
    }

    /// Run [`submit`](Self::submit) on a background task so the caller is not held up
    pub fn spawn_submit(self: &Arc<Self>, raw: impl Into<String>) -> JoinHandle<Result<Resolution>> {
        let pipeline = Arc::clone(self);
        let raw = raw.into();
        tokio::spawn(async move { pipeline.submit(&raw).await })
    }

    /// Retry queued identifiers in FIFO order
    ///
    /// Each identifier is attempted at most once per pass and fully settled
    /// before the next one starts. A renewed network failure ends the pass and
    /// leaves that identifier and everything behind it queued.
    pub async fn drain_pending(&self) -> DrainReport {
        let _pass = self.drain_lock.lock().await;

        let mut report = DrainReport::default();
        let snapshot = {
            let state = self.state.lock().await;
            if state.pending.is_empty() {
                return report;
            }
            state.pending.isbns()
        };
        tracing::info!(count = snapshot.len(), "draining pending identifiers");

        for isbn in snapshot {
            if !self.claim_queued(&isbn).await {
                continue;
            }

            let outcome = self.attempt(&isbn).await;
            match self.commit(&isbn, outcome).await {
                Resolution::Resolved(_) => report.resolved.push(isbn),
                Resolution::Rejected(_) => report.rejected.push(isbn),
                Resolution::Queued { .. } => {
                    tracing::info!(%isbn, "still offline, stopping drain");
                    report.stopped_offline = true;
                    break;
                }
                Resolution::AlreadyResolving => {}
            }
        }

        report.remaining = self.state.lock().await.pending.len();
        if report.remaining == 0 && !report.resolved.is_empty() {
            self.broadcast(Notice::backlog_cleared(report.resolved.len()));
        }
        report
    }

    /// Current state of `isbn`, or `None` when it is neither resolving nor queued
    pub async fn state_of(&self, isbn: &Isbn) -> Option<ResolutionState> {
        let state = self.state.lock().await;
        if state.resolving.contains(isbn) {
            Some(ResolutionState::Resolving)
        } else if state.pending.contains(isbn) {
            Some(ResolutionState::Queued)
        } else {
            None
        }
    }

    /// Snapshot of the citation list
    pub async fn citations(&self) -> Vec<Citation> {
        self.state.lock().await.citations.all().to_vec()
    }

    /// Snapshot of the pending queue
    pub async fn pending(&self) -> Vec<PendingIdentifier> {
        self.state.lock().await.pending.entries().to_vec()
    }

    /// Append a citation entered by the user, returning its index
    pub async fn add_citation(&self, citation: Citation) -> Result<usize> {
        let mut state = self.state.lock().await;
        let result = state.citations.append(citation).await;
        let index = state.citations.len() - 1;
        self.surface_persistence(result.map(|()| index))
    }

    /// Apply a user edit to the citation at `index` and return the edited citation
    ///
    /// The read, the edit and the write happen under one lock acquisition. An
    /// edit that fails leaves the citation untouched.
    pub async fn edit_citation<F>(&self, index: usize, edit: F) -> Result<Citation>
    where
        F: FnOnce(&mut Citation) -> Result<()>,
    {
        let mut state = self.state.lock().await;
        let len = state.citations.len();
        let mut citation = state
            .citations
            .all()
            .get(index)
            .cloned()
            .ok_or(CitationError::IndexOutOfRange { index, len })?;
        edit(&mut citation)?;

        let result = state.citations.update(index, citation.clone()).await;
        self.surface_persistence(result.map(|_| citation))
    }

    /// Delete the citation at `index`
    pub async fn remove_citation(&self, index: usize) -> Result<Citation> {
        let result = self.state.lock().await.citations.remove(index).await;
        self.surface_persistence(result)
    }

    /// Claim a queued identifier for a drain; false when it is gone or already claimed
    async fn claim_queued(&self, isbn: &Isbn) -> bool {
        let mut state = self.state.lock().await;
        if !state.pending.contains(isbn) {
            return false;
        }
        state.resolving.insert(isbn.clone())
    }

    async fn attempt(&self, isbn: &Isbn) -> std::result::Result<BookMatch, LookupError> {
        match tokio::time::timeout(self.lookup_timeout, self.lookup.lookup(isbn)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(LookupError::NetworkUnavailable(format!(
                "lookup timed out after {:?}",
                self.lookup_timeout
            ))),
        }
    }

    /// Apply a lookup outcome and release the claim on `isbn`
    async fn commit(
        &self,
        isbn: &Isbn,
        outcome: std::result::Result<BookMatch, LookupError>,
    ) -> Resolution {
        let mut state = self.state.lock().await;
        state.resolving.remove(isbn);

        match outcome {
            Ok(book) => {
                let text = format_citation(&book.record);
                let citation = match Citation::new(text, Some(book.cover.into_bytes())) {
                    Ok(citation) => citation.with_isbn(isbn.clone()),
                    Err(e) => {
                        let err = LookupError::MalformedResponse(e.to_string());
                        self.reject(&mut state, isbn, &err).await;
                        return Resolution::Rejected(err);
                    }
                };

                if let Err(e) = state.citations.append(citation.clone()).await {
                    self.report_persistence("citations", &e);
                }
                if let Err(e) = state.pending.remove(isbn).await {
                    self.report_persistence("pending identifiers", &e);
                }

                tracing::info!(%isbn, citation = citation.display_text(), "citation generated");
                self.broadcast(Notice::success(citation.display_text()));
                Resolution::Resolved(citation)
            }
            Err(LookupError::NetworkUnavailable(reason)) => {
                let newly_queued = match state.pending.enqueue(isbn.clone()).await {
                    Ok(added) => added,
                    Err(e) => {
                        self.report_persistence("pending identifiers", &e);
                        true
                    }
                };

                tracing::info!(%isbn, %reason, newly_queued, "network unavailable, identifier queued");
                self.broadcast(Notice::offline_queued(isbn));
                Resolution::Queued { newly_queued }
            }
            Err(err) => {
                self.reject(&mut state, isbn, &err).await;
                Resolution::Rejected(err)
            }
        }
    }

    async fn reject(&self, state: &mut PipelineState, isbn: &Isbn, err: &LookupError) {
        if let Err(e) = state.pending.remove(isbn).await {
            self.report_persistence("pending identifiers", &e);
        }

        tracing::info!(%isbn, error = %err, "lookup rejected");
        let notice = match err {
            LookupError::NotFound => Notice::not_found(isbn),
            other => Notice::lookup_failed(isbn, &other.to_string()),
        };
        self.broadcast(notice);
    }

    /// Write failures of user edits are broadcast as well as returned
    fn surface_persistence<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err @ CiteCamError::Persistence(_)) = &result {
            self.report_persistence("citations", err);
        }
        result
    }

    fn report_persistence(&self, what: &str, err: &CiteCamError) {
        tracing::error!(list = what, error = %err, "failed to persist list");
        self.broadcast(Notice::persistence_failure(what, &err.to_string()));
    }

    fn broadcast(&self, notice: Notice) {
        // No subscribers is fine
        let _ = self.notices.send(notice);
    }
}
