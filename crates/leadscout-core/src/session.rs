//! Search lifecycle: one query in flight, an error that clears on retry, and
//! all-or-nothing replacement of the transient results.

use std::future::Future;

use thiserror::Error;

use crate::error::SearchFailed;
use crate::lead::Lead;
use crate::storage::LeadStorage;
use crate::store::LeadStore;

/// Anything that can turn a location into a list of fresh leads.
pub trait LeadFinder {
    /// Run one search for `location` (already trimmed, non-empty).
    fn find_leads(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<Vec<Lead>, SearchFailed>> + Send;
}

/// A search request that was refused before reaching the finder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchRejected {
    #[error("enter a location to search")]
    EmptyLocation,

    #[error("a search for \"{location}\" is already running")]
    AlreadyRunning { location: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Rejected(#[from] SearchRejected),

    #[error(transparent)]
    Failed(#[from] SearchFailed),
}

/// Loading and error state for the search view.
#[derive(Debug, Default)]
pub struct SearchState {
    pending: Option<String>,
    error: Option<String>,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn pending_location(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Message from the last failed search, until the next attempt starts.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Accept a search request and mark it in flight.
    ///
    /// Returns the trimmed location. Clears any previous error.
    ///
    /// # Errors
    ///
    /// [`SearchRejected::EmptyLocation`] for blank input,
    /// [`SearchRejected::AlreadyRunning`] while another search is pending.
    pub fn begin(&mut self, raw_location: &str) -> Result<String, SearchRejected> {
        let location = raw_location.trim();
        if location.is_empty() {
            return Err(SearchRejected::EmptyLocation);
        }
        if let Some(running) = &self.pending {
            return Err(SearchRejected::AlreadyRunning {
                location: running.clone(),
            });
        }
        self.error = None;
        self.pending = Some(location.to_owned());
        Ok(location.to_owned())
    }

    /// Apply the outcome of the pending search to `store`.
    ///
    /// Success replaces the transient results; failure records the message
    /// and leaves the transient results empty.
    ///
    /// # Errors
    ///
    /// Passes a [`SearchFailed`] outcome through after recording it.
    pub fn finish<S: LeadStorage>(
        &mut self,
        store: &mut LeadStore<S>,
        outcome: Result<Vec<Lead>, SearchFailed>,
    ) -> Result<usize, SearchFailed> {
        let location = self.pending.take().unwrap_or_default();
        match outcome {
            Ok(leads) => {
                let count = leads.len();
                store.replace_search_results(leads);
                self.error = None;
                tracing::info!(location = %location, count, "search completed");
                Ok(count)
            }
            Err(e) => {
                store.clear_search_results();
                self.error = Some(e.to_string());
                tracing::warn!(location = %location, "search failed");
                Err(e)
            }
        }
    }
}

/// Begin, run and finish one search against `finder`.
///
/// # Errors
///
/// Returns [`SearchError::Rejected`] without calling the finder when the
/// request is refused, or [`SearchError::Failed`] when the finder fails.
pub async fn run_search<F, S>(
    finder: &F,
    state: &mut SearchState,
    store: &mut LeadStore<S>,
    raw_location: &str,
) -> Result<usize, SearchError>
where
    F: LeadFinder,
    S: LeadStorage,
{
    let location = state.begin(raw_location)?;
    let outcome = finder.find_leads(&location).await;
    Ok(state.finish(store, outcome)?)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    use super::*;
    use crate::error::SEARCH_FAILED_MESSAGE;
    use crate::lead::BusinessListing;
    use crate::storage::MemoryStorage;

    struct FakeFinder {
        names: Vec<&'static str>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeFinder {
        fn returning(names: Vec<&'static str>) -> Self {
            Self {
                names,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                names: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl LeadFinder for FakeFinder {
        async fn find_leads(&self, location: &str) -> Result<Vec<Lead>, SearchFailed> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchFailed);
            }
            let now = Utc::now();
            Ok(self
                .names
                .iter()
                .map(|name| {
                    Lead::from_listing(
                        BusinessListing {
                            name: (*name).to_string(),
                            phone: "555".to_string(),
                            address: "addr".to_string(),
                            cuisine: String::new(),
                            maps_url: "https://maps.google.com".to_string(),
                        },
                        location,
                        now,
                    )
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn successful_search_replaces_results_with_fresh_leads() {
        let finder = FakeFinder::returning(vec!["A", "B", "C"]);
        let mut state = SearchState::new();
        let mut store = LeadStore::open(MemoryStorage::new());

        let count = run_search(&finder, &mut state, &mut store, "  Tulsa, OK  ")
            .await
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(store.results().len(), 3);
        for lead in store.results() {
            assert!(!lead.called);
            assert!(lead.notes.is_empty());
            assert_eq!(lead.location, "Tulsa, OK");
        }
        let mut ids: Vec<_> = store.results().iter().map(|l| l.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(!state.is_pending());
        assert!(state.error().is_none());
    }

    #[tokio::test]
    async fn failed_search_records_message_and_empties_results() {
        let mut state = SearchState::new();
        let mut store = LeadStore::open(MemoryStorage::new());
        run_search(&FakeFinder::returning(vec!["A"]), &mut state, &mut store, "Tulsa")
            .await
            .unwrap();

        let err = run_search(&FakeFinder::failing(), &mut state, &mut store, "Tulsa")
            .await
            .unwrap_err();

        assert_eq!(err, SearchError::Failed(SearchFailed));
        assert_eq!(err.to_string(), SEARCH_FAILED_MESSAGE);
        assert_eq!(state.error(), Some(SEARCH_FAILED_MESSAGE));
        assert!(store.results().is_empty());
        assert!(!state.is_pending());
    }

    #[tokio::test]
    async fn next_attempt_clears_previous_error() {
        let mut state = SearchState::new();
        let mut store = LeadStore::open(MemoryStorage::new());
        let _ = run_search(&FakeFinder::failing(), &mut state, &mut store, "Tulsa").await;
        assert!(state.error().is_some());

        state.begin("Norman, OK").unwrap();
        assert!(state.error().is_none());
    }

    #[tokio::test]
    async fn blank_location_never_reaches_finder() {
        let finder = FakeFinder::returning(vec!["A"]);
        let mut state = SearchState::new();
        let mut store = LeadStore::open(MemoryStorage::new());

        let err = run_search(&finder, &mut state, &mut store, "   ")
            .await
            .unwrap_err();

        assert_eq!(err, SearchError::Rejected(SearchRejected::EmptyLocation));
        assert_eq!(finder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn second_begin_while_pending_is_rejected() {
        let mut state = SearchState::new();
        state.begin("Tulsa").unwrap();

        let err = state.begin("Norman").unwrap_err();

        assert_eq!(
            err,
            SearchRejected::AlreadyRunning {
                location: "Tulsa".to_string()
            }
        );
        assert_eq!(state.pending_location(), Some("Tulsa"));
    }

    #[test]
    fn search_does_not_touch_saved_leads() {
        let storage = MemoryStorage::new();
        let mut store = LeadStore::open(storage);
        let mut state = SearchState::new();
        state.begin("Tulsa").unwrap();

        state.finish(&mut store, Ok(Vec::new())).unwrap();

        assert!(store.saved().is_empty());
        assert!(store.storage().contents().is_none());
    }
}
