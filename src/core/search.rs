//! Search coordination for overlapping lookups
//!
//! A [`SearchSession`] belongs to the caller (the UI or the command line front
//! end). Starting a search supersedes the previous one: its cancellation token
//! fires and any result it still produces is dropped instead of delivered.

use crate::core::source::{CompanyInfoSource, CompletionError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

/// Handle identifying one search
#[derive(Debug, Clone)]
pub struct SearchTicket {
    pub generation: u64,
    pub token: CancellationToken,
}

/// Result of one search, delivered at most once
#[derive(Debug)]
pub struct SearchOutcome {
    pub generation: u64,
    pub subject: String,
    pub result: Result<String, CompletionError>,
}

/// Caller-owned coordinator for company lookups
pub struct SearchSession {
    source: Arc<dyn CompanyInfoSource>,
    generation: Arc<AtomicU64>,
    // Held while superseding and while delivering, so the two never interleave.
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl SearchSession {
    pub fn new(source: Arc<dyn CompanyInfoSource>) -> Self {
        Self {
            source,
            generation: Arc::new(AtomicU64::new(0)),
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Generation of the most recently started search
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a new generation, cancelling the previous search
    pub async fn begin(&self) -> SearchTicket {
        let mut current = self.current.lock().await;
        self.supersede(&mut current)
    }

    fn supersede(&self, current: &mut Option<CancellationToken>) -> SearchTicket {
        let token = CancellationToken::new();
        if let Some(previous) = current.replace(token.clone()) {
            previous.cancel();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket { generation, token }
    }

    /// Run a search on a background task
    ///
    /// The receiver yields exactly one outcome for the latest search. If a
    /// newer search starts first, the sender is dropped without sending and
    /// the receiver observes a closed channel.
    pub async fn spawn(&self, subject: impl Into<String>) -> oneshot::Receiver<SearchOutcome> {
        let ticket = self.begin().await;
        self.spawn_with_ticket(subject.into(), ticket)
    }

    fn spawn_with_ticket(
        &self,
        subject: String,
        ticket: SearchTicket,
    ) -> oneshot::Receiver<SearchOutcome> {
        let (tx, rx) = oneshot::channel();

        let source = Arc::clone(&self.source);
        let latest = Arc::clone(&self.generation);
        let current = Arc::clone(&self.current);
        let search_id = Uuid::new_v4();
        let span = info_span!("search", %search_id, generation = ticket.generation);

        tokio::spawn(
            async move {
                info!(source = source.source_name(), "Searching for {:?}", subject);
                let result = source
                    .fetch_company_info(&subject, Some(&ticket.token))
                    .await;

                let _delivery = current.lock().await;
                if ticket.token.is_cancelled()
                    || latest.load(Ordering::SeqCst) != ticket.generation
                {
                    debug!("Dropping result of superseded search");
                    return;
                }

                match &result {
                    Ok(content) => info!(bytes = content.len(), "Search completed"),
                    Err(e) => info!(kind = ?e.kind(), "Search failed: {}", e),
                }

                let _ = tx.send(SearchOutcome {
                    generation: ticket.generation,
                    subject,
                    result,
                });
            }
            .instrument(span),
        );

        rx
    }

    /// Run a search and wait for its outcome
    ///
    /// Returns `None` if the search was superseded before delivery.
    pub async fn search(&self, subject: impl Into<String>) -> Option<SearchOutcome> {
        self.spawn(subject).await.await.ok()
    }
}
