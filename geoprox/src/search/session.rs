//! The active search of an interactive front end.

use super::error::SearchFailure;
use super::orchestrator::{PagedSearch, SearchHandle};
use super::types::{SearchOutcome, SearchRequest, SearchResult, SearchState};
use crate::wfs::AsyncHttpClient;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owns at most one running search and the last completed result.
///
/// Starting a new search cancels the previous one, so only the newest
/// search ever reaches the user. The last result feeds follow-up questions
/// such as a compliance check.
pub struct SearchSession<C> {
    search: PagedSearch<C>,
    active: Option<CancellationToken>,
    state: Option<watch::Receiver<SearchState>>,
    last_result: Option<SearchResult>,
}

impl<C: AsyncHttpClient + 'static> SearchSession<C> {
    pub fn new(search: PagedSearch<C>) -> Self {
        Self {
            search,
            active: None,
            state: None,
            last_result: None,
        }
    }

    /// Starts a search, cancelling any search still running.
    pub fn start(&mut self, request: SearchRequest) -> SearchHandle {
        if let Some(previous) = self.active.take() {
            debug!("Superseding running search");
            previous.cancel();
        }

        let handle = self.search.spawn(request);
        self.active = Some(handle.cancellation_token());
        self.state = Some(handle.state_receiver());
        handle
    }

    /// Waits for a started search and records its result.
    ///
    /// Only a search that was not cancelled updates the last result; a
    /// search in range of nothing clears it.
    pub async fn finish(&mut self, handle: SearchHandle) -> Result<SearchOutcome, SearchFailure> {
        let token = handle.cancellation_token();
        let outcome = handle.join().await;

        if !token.is_cancelled() {
            if let Ok(outcome) = &outcome {
                self.last_result = outcome.result().cloned();
            }
            self.active = None;
        }
        outcome
    }

    /// Cancels the running search, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }

    /// State of the most recently started search.
    pub fn state(&self) -> SearchState {
        self.state
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or_default()
    }

    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last_result.as_ref()
    }
}
