//! Generation tokens for discarding superseded fetches.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation issued to a single fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Hands out increasing tickets; only the newest ticket may deliver its result.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct FetchTracker {
    latest: Arc<AtomicU64>,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fetch, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Supersedes any in-flight fetch without starting a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    /// Runs `fetch` and returns its output only if no newer fetch started
    /// (and no invalidation happened) while it was running.
    pub async fn run<F, T>(&self, fetch: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin();
        let output = fetch.await;
        if self.is_current(ticket) {
            Some(output)
        } else {
            log::debug!("Discarding stale fetch result (ticket {})", ticket.0);
            None
        }
    }
}
