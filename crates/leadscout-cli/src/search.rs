use std::fmt::Write as _;

use leadscout_core::{run_search, LeadFinder, LeadStorage, LeadStore, SearchError, SearchState};

use crate::render::{render_search_error, render_table, View};

/// Run one search and optionally promote every result to the saved list.
///
/// Returns the text to print: the results table, plus a save summary when
/// `save_all` is set.
///
/// # Errors
///
/// Returns an error when the location is blank, the search fails (with the
/// fixed user-facing message), or saved leads cannot be written back.
pub(crate) async fn run_search_command<F, S>(
    finder: &F,
    store: &mut LeadStore<S>,
    location: &str,
    save_all: bool,
) -> anyhow::Result<String>
where
    F: LeadFinder,
    S: LeadStorage,
{
    let mut state = SearchState::new();
    match run_search(finder, &mut state, store, location).await {
        Ok(count) => {
            let mut out = format!(
                "Found {count} restaurants without a website in {}\n{}",
                location.trim(),
                render_table(store.results(), View::Search)
            );
            if save_all {
                let mut added = 0;
                for lead in store.results().to_vec() {
                    if store.save_lead(lead) {
                        added += 1;
                    }
                }
                store.check_persisted()?;
                let _ = writeln!(
                    out,
                    "saved {added} new leads ({} already saved)",
                    count - added
                );
            }
            Ok(out)
        }
        Err(SearchError::Failed(e)) => {
            anyhow::bail!("{}", render_search_error(&e.to_string()).trim_end())
        }
        Err(SearchError::Rejected(e)) => Err(e.into()),
    }
}
