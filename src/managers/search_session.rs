//! Debounced, paginated search state machine.
//!
//! One `SearchSession` backs one search screen. It is deliberately
//! clock-driven (callers pass the current time into [`SearchSession::input`]
//! and [`SearchSession::poll_due`]) so the debounce contract is testable
//! without timers. The per-screen managers own the actual gateway calls.
//!
//! Every dispatched fetch carries a generation number; a response whose
//! generation is no longer current is dropped, so a slow early keystroke
//! can never overwrite the results of a later one.

use crate::types::search::SearchPhase;

/// Milliseconds of keyboard silence required before a fetch fires.
pub const DEBOUNCE_MS: i64 = 1500;

/// Queries shorter than this never trigger a network call.
pub const MIN_QUERY_LEN: usize = 3;

/// Fixed number of results shown per page.
pub const PAGE_SIZE: usize = 10;

/// Idle hint exposed to the view for short queries.
pub const MIN_QUERY_HINT: &str = "Type at least 3 characters to search";

/// State for one search screen: debounce window, fetch generation,
/// retained results and the current page.
pub struct SearchSession<T> {
    query: String,
    phase: SearchPhase,
    deadline_ms: Option<i64>,
    generation: u64,
    results: Vec<T>,
    current_page: usize,
}

impl<T> SearchSession<T> {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            phase: SearchPhase::idle(),
            deadline_ms: None,
            generation: 0,
            results: Vec::new(),
            current_page: 1,
        }
    }

    /// Records a keystroke at `now_ms`.
    ///
    /// Every keystroke resets the debounce timer. Queries below the
    /// minimum length cancel any pending fetch and park the screen in an
    /// explicit idle-with-hint state.
    pub fn input(&mut self, text: &str, now_ms: i64) {
        self.query = text.trim().to_string();

        if self.query.len() < MIN_QUERY_LEN {
            self.deadline_ms = None;
            self.results.clear();
            self.current_page = 1;
            self.phase = if self.query.is_empty() {
                SearchPhase::idle()
            } else {
                SearchPhase::idle_with_hint(MIN_QUERY_HINT)
            };
            return;
        }

        self.deadline_ms = Some(now_ms + DEBOUNCE_MS);
        self.phase = SearchPhase::Debouncing;
    }

    /// Returns the query to fetch once the debounce window has elapsed.
    ///
    /// Fires at most once per window: the deadline is consumed and the
    /// session transitions to `Loading`. The returned generation must be
    /// handed back to [`SearchSession::apply_success`] /
    /// [`SearchSession::apply_error`].
    pub fn poll_due(&mut self, now_ms: i64) -> Option<(String, u64)> {
        let deadline = self.deadline_ms?;
        if now_ms < deadline {
            return None;
        }
        self.deadline_ms = None;
        self.phase = SearchPhase::Loading;
        self.generation += 1;
        Some((self.query.clone(), self.generation))
    }

    /// Installs fetched results. Stale generations are dropped.
    pub fn apply_success(&mut self, generation: u64, items: Vec<T>) {
        if generation != self.generation {
            return;
        }
        self.phase = if items.is_empty() {
            SearchPhase::Empty
        } else {
            SearchPhase::Success
        };
        self.results = items;
        self.current_page = 1;
    }

    /// Installs a fetch failure, discarding any prior results.
    /// Stale generations are dropped.
    pub fn apply_error(&mut self, generation: u64, message: String) {
        if generation != self.generation {
            return;
        }
        self.results.clear();
        self.current_page = 1;
        self.phase = SearchPhase::Error(message);
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Number of pages needed for the retained results (0 when empty).
    pub fn total_pages(&self) -> usize {
        self.results.len().div_ceil(PAGE_SIZE)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Advances one page. No-op at the last page.
    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
    }

    /// Goes back one page. No-op at page 1.
    pub fn previous_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// The slice of results for the current page.
    pub fn page_items(&self) -> &[T] {
        let start = (self.current_page - 1) * PAGE_SIZE;
        if start >= self.results.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(self.results.len());
        &self.results[start..end]
    }
}

impl<T> Default for SearchSession<T> {
    fn default() -> Self {
        Self::new()
    }
}
