use serde::Serialize;

/// Phase of a search screen.
///
/// Every data-fetching screen exposes loading, error-with-message and
/// success-with-data (or explicit empty) as mutually exclusive states;
/// the two pre-fetch phases cover the debounce window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SearchPhase {
    /// Nothing to fetch. `hint` tells the view why (e.g. the minimum
    /// query length message).
    Idle { hint: Option<String> },
    /// A keystroke was recorded; waiting out the debounce window.
    Debouncing,
    /// The gateway call is in flight.
    Loading,
    /// Results arrived and at least one item is available.
    Success,
    /// The call succeeded but matched nothing.
    Empty,
    /// The call failed; the message comes verbatim from the gateway.
    Error(String),
}

impl SearchPhase {
    pub fn idle() -> Self {
        SearchPhase::Idle { hint: None }
    }

    pub fn idle_with_hint(hint: &str) -> Self {
        SearchPhase::Idle {
            hint: Some(hint.to_string()),
        }
    }
}
