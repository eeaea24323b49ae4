//! User search screen manager.
//!
//! Same shape as the repository search manager, bound to the user-search
//! gateway call.

use std::sync::Arc;

use crate::managers::search_session::SearchSession;
use crate::services::github_gateway::GitHubGateway;
use crate::types::github::RemoteUser;
use crate::types::search::SearchPhase;

pub struct UserSearchManager {
    gateway: Arc<GitHubGateway>,
    session: SearchSession<RemoteUser>,
}

impl UserSearchManager {
    pub fn new(gateway: Arc<GitHubGateway>) -> Self {
        Self {
            gateway,
            session: SearchSession::new(),
        }
    }

    /// Records a keystroke at `now_ms`, resetting the debounce window.
    pub fn input(&mut self, text: &str, now_ms: i64) {
        self.session.input(text, now_ms);
    }

    /// Fires the gateway call if the debounce window has elapsed.
    /// Returns true when a fetch was performed.
    pub async fn tick(&mut self, now_ms: i64) -> bool {
        let Some((query, generation)) = self.session.poll_due(now_ms) else {
            return false;
        };

        match self.gateway.search_users(&query).await {
            Ok(items) => self.session.apply_success(generation, items),
            Err(e) => self.session.apply_error(generation, e.to_string()),
        }
        true
    }

    pub fn phase(&self) -> &SearchPhase {
        self.session.phase()
    }

    pub fn page_items(&self) -> &[RemoteUser] {
        self.session.page_items()
    }

    pub fn current_page(&self) -> usize {
        self.session.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.session.total_pages()
    }

    pub fn next_page(&mut self) {
        self.session.next_page();
    }

    pub fn previous_page(&mut self) {
        self.session.previous_page();
    }
}
