//! Founder lookup as the user types.

use std::time::Duration;

use tokio::sync::watch;

use crate::config::SearchConfig;
use crate::db::{founder_repo, Database};
use crate::debounce::Debouncer;
use crate::error::{MatchError, Result};
use crate::model::Founder;

/// Founders whose name, contact or business type contains `term`,
/// newest first. A blank term finds nothing.
pub fn search_founders(db: &Database, term: &str, limit: u64) -> Result<Vec<Founder>> {
    founder_repo::search(db, term, limit).map_err(MatchError::read("founders"))
}

/// What subscribers of a [`FounderSearch`] currently see.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    /// Nothing has been searched yet.
    #[default]
    Idle,
    Results {
        term: String,
        founders: Vec<Founder>,
    },
    /// The store could not be read. Earlier results are no longer shown.
    Failed {
        term: String,
        message: String,
    },
}

impl SearchState {
    /// Founders of the last successful search; empty otherwise.
    pub fn founders(&self) -> &[Founder] {
        match self {
            SearchState::Results { founders, .. } => founders.as_slice(),
            SearchState::Idle | SearchState::Failed { .. } => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SearchState::Failed { .. })
    }
}

/// Debounced founder search. The outcome is published on a watch channel
/// once input has been quiet for the configured period.
pub struct FounderSearch {
    debouncer: Debouncer<String>,
    state: watch::Receiver<SearchState>,
}

impl FounderSearch {
    pub fn new(db: Database, config: &SearchConfig) -> Self {
        let (tx, state) = watch::channel(SearchState::Idle);
        let limit = config.founder_limit;

        let debouncer = Debouncer::new(Duration::from_millis(config.debounce_ms), move |term: String| {
            let next = match search_founders(&db, &term, limit) {
                Ok(founders) => {
                    log::debug!("Founder search '{}' matched {}", term, founders.len());
                    SearchState::Results { term, founders }
                }
                Err(e) => SearchState::Failed {
                    term,
                    message: e.to_string(),
                },
            };
            tx.send_replace(next);
        });

        Self { debouncer, state }
    }

    /// Records new input. Must be called from within a tokio runtime.
    pub fn input(&self, term: impl Into<String>) {
        self.debouncer.push(term.into());
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn latest(&self) -> Vec<Founder> {
        self.state.borrow().founders().to_vec()
    }
}
