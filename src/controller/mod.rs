//! The state behind a results page: the current query, the fetched results
//! and summary bullets, each card's summary and the comparison selection.
//!
//! Fetches are split into a `begin_*` and a `finish_*` step so the session
//! lock is never held while waiting on the backend.

pub mod comparison;
pub mod pagination;
pub mod selection;
pub mod summary;

use std::{collections::HashMap, sync::Arc};

use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, warn};

use crate::backend::{Backend, FetchError, ResultItem, SearchResults};

pub use comparison::{load_comparison, ComparisonParams, ComparisonView};
pub use selection::{ComparisonSelection, ComparisonTarget, SelectedItem, ValidationError};
pub use summary::CardSummary;

/// Shown for every kind of search failure. Timeouts and network errors look
/// the same to the user.
pub const SEARCH_ERROR_MESSAGE: &str = "There was an error fetching the results.";

pub type SharedController = Arc<Mutex<ResultsController>>;

#[derive(Debug, Default)]
pub struct ResultsController {
    query: String,
    /// The query the stored results belong to, if any search succeeded.
    loaded_query: Option<String>,
    results: Vec<ResultItem>,
    summary_bullets: Vec<String>,
    loading: bool,
    error: Option<SearchError>,
    /// Bumped for every search so a slow earlier search can't clobber a
    /// later one.
    generation: u64,
    selection: ComparisonSelection,
    card_summaries: HashMap<String, CardSummary>,
}

/// A failed search and the query it was for.
#[derive(Debug)]
struct SearchError {
    query: String,
    message: String,
}

/// Handed out by [`ResultsController::begin_search`] and given back with the
/// response.
#[derive(Debug)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl ResultsController {
    pub fn shared() -> SharedController {
        Arc::new(Mutex::new(Self::default()))
    }

    pub fn results(&self) -> &[ResultItem] {
        &self.results
    }

    pub fn summary_bullets(&self) -> &[String] {
        &self.summary_bullets
    }

    /// Whether a search for `query` is running.
    pub fn is_loading_for(&self, query: &str) -> bool {
        self.loading && self.query == query
    }

    /// The error from the last search, if that search was for `query`.
    pub fn error_for(&self, query: &str) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|err| err.query == query)
            .map(|err| err.message.as_str())
    }

    /// Whether the stored results are the ones for `query`.
    pub fn has_results_for(&self, query: &str) -> bool {
        self.loaded_query.as_deref() == Some(query)
    }

    pub fn selection(&self) -> &ComparisonSelection {
        &self.selection
    }

    /// Whether showing `query` needs a search, i.e. the stored results are
    /// for something else and no search for it is already running.
    pub fn needs_fetch(&self, query: &str) -> bool {
        !self.is_loading_for(query) && !self.has_results_for(query)
    }

    /// Start a search. An empty query clears the results instead and returns
    /// `None`, since there's nothing to fetch.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        self.generation += 1;
        self.query = query.to_string();
        self.error = None;

        if query.is_empty() {
            self.loading = false;
            self.loaded_query = None;
            self.results.clear();
            self.summary_bullets.clear();
            self.card_summaries.clear();
            return None;
        }

        self.loading = true;
        Some(SearchTicket {
            generation: self.generation,
            query: query.to_string(),
        })
    }

    pub fn finish_search(&mut self, ticket: SearchTicket, res: Result<SearchResults, FetchError>) {
        if ticket.generation != self.generation {
            debug!("discarding stale search for {:?}", ticket.query);
            return;
        }

        self.loading = false;
        match res {
            Ok(SearchResults {
                results,
                summary_result,
            }) => {
                self.results = results;
                self.summary_bullets = summary_result;
                self.loaded_query = Some(ticket.query);
                self.card_summaries.clear();
            }
            Err(err) => {
                warn!("search for {:?} failed: {err}", ticket.query);
                self.error = Some(SearchError {
                    query: ticket.query,
                    message: SEARCH_ERROR_MESSAGE.to_string(),
                });
            }
        }
    }

    /// The results on the given page. Out of range pages are empty.
    pub fn change_page(&self, page: usize) -> &[ResultItem] {
        pagination::page_slice(&self.results, page)
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.results.len())
    }

    pub fn position_of(&self, link: &str) -> Option<usize> {
        self.results.iter().position(|r| r.link == link)
    }

    pub fn find_result(&self, link: &str) -> Option<&ResultItem> {
        self.results.iter().find(|r| r.link == link)
    }

    pub fn card_summary(&self, link: &str) -> &CardSummary {
        const IDLE: &CardSummary = &CardSummary::Idle;
        self.card_summaries.get(link).unwrap_or(IDLE)
    }

    pub fn any_summary_loading(&self) -> bool {
        self.card_summaries.values().any(CardSummary::is_loading)
    }

    /// Mark a card as loading. Returns false if the link isn't one of the
    /// current results or a summary for it is already being generated.
    pub fn begin_summary(&mut self, link: &str) -> bool {
        if self.find_result(link).is_none() || self.card_summary(link).is_loading() {
            return false;
        }
        self.card_summaries
            .insert(link.to_string(), CardSummary::loading());
        true
    }

    pub fn finish_summary(&mut self, link: &str, res: Result<String, FetchError>) {
        // a new search may have replaced the card while we were waiting
        if !self.card_summary(link).is_loading() {
            debug!("dropping summary for {link}, its card is gone");
            return;
        }
        if let Err(err) = &res {
            warn!("summary for {link} failed: {err}");
        }
        self.card_summaries
            .insert(link.to_string(), CardSummary::from_result(res));
    }

    pub fn toggle_comparison_selection(&mut self, item: SelectedItem) {
        self.selection.toggle(item);
    }

    pub fn remove_comparison_selection(&mut self, index: usize) {
        self.selection.remove(index);
    }

    pub fn open_comparison(&self) -> Result<ComparisonTarget, ValidationError> {
        self.selection.comparison_target()
    }
}

/// Run a search and store what comes back.
///
/// The request runs in its own task, so the result is stored even if the
/// caller stops waiting (the browser went away mid-search).
pub async fn load_results_for_query(controller: &SharedController, backend: &Backend, query: &str) {
    let Some(ticket) = controller.lock().await.begin_search(query) else {
        return;
    };
    let controller = controller.clone();
    let backend = backend.clone();
    let task = tokio::spawn(async move {
        let res = backend.search(&ticket.query).await;
        controller.lock().await.finish_search(ticket, res);
    });
    if let Err(err) = task.await {
        warn!("search task failed: {err}");
    }
}

/// Generate the summary for one result card. The work runs in its own task
/// so the card always leaves the loading state, whether or not anyone waits
/// on the returned handle. `None` if the card can't start one right now.
pub async fn generate_summary_for(
    controller: &SharedController,
    backend: &Backend,
    link: &str,
) -> Option<JoinHandle<()>> {
    if !controller.lock().await.begin_summary(link) {
        return None;
    }
    let controller = controller.clone();
    let backend = backend.clone();
    let link = link.to_string();
    Some(tokio::spawn(async move {
        let res = backend.summarize(&link).await;
        controller.lock().await.finish_summary(&link, res);
    }))
}
