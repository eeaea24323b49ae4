//! Unit tests for the search session state machine and the screen
//! managers: debounce timing, minimum query length, pagination clamping,
//! stale-generation discard, and gateway error propagation.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use std::sync::Arc;

use gitpulse::managers::repo_search_manager::RepositorySearchManager;
use gitpulse::managers::search_session::{
    SearchSession, DEBOUNCE_MS, MIN_QUERY_HINT, PAGE_SIZE,
};
use gitpulse::services::github_gateway::GitHubGateway;
use gitpulse::types::search::SearchPhase;

fn session() -> SearchSession<u32> {
    SearchSession::new()
}

#[test]
fn test_short_query_never_arms_the_debounce() {
    let mut s = session();
    s.input("ab", 0);

    assert_eq!(
        *s.phase(),
        SearchPhase::Idle {
            hint: Some(MIN_QUERY_HINT.to_string())
        }
    );
    // No deadline was armed, so nothing ever becomes due.
    assert!(s.poll_due(i64::MAX).is_none());
}

#[test]
fn test_empty_query_is_plain_idle() {
    let mut s = session();
    s.input("", 0);
    assert_eq!(*s.phase(), SearchPhase::Idle { hint: None });
}

#[test]
fn test_debounce_fires_exactly_once_after_last_keystroke() {
    let mut s = session();
    s.input("ab", 0);
    s.input("abc", 500);

    // Nothing is due until 1500ms after the *last* keystroke.
    assert!(s.poll_due(500 + DEBOUNCE_MS - 1).is_none());

    let (query, _) = s.poll_due(500 + DEBOUNCE_MS).expect("window elapsed");
    assert_eq!(query, "abc");
    assert_eq!(*s.phase(), SearchPhase::Loading);

    // Exactly one call per window.
    assert!(s.poll_due(500 + DEBOUNCE_MS + 10_000).is_none());
}

#[test]
fn test_keystroke_resets_the_window() {
    let mut s = session();
    s.input("abc", 0);
    s.input("abcd", DEBOUNCE_MS - 1);

    // The old deadline would have passed; the new keystroke replaced it.
    assert!(s.poll_due(DEBOUNCE_MS).is_none());
    let (query, _) = s.poll_due(DEBOUNCE_MS - 1 + DEBOUNCE_MS).expect("new window");
    assert_eq!(query, "abcd");
}

#[test]
fn test_pagination_boundaries() {
    let mut s = session();
    s.input("abc", 0);
    let (_, generation) = s.poll_due(DEBOUNCE_MS).unwrap();
    s.apply_success(generation, (0..25).collect());

    assert_eq!(*s.phase(), SearchPhase::Success);
    assert_eq!(s.total_pages(), 3);
    assert_eq!(s.current_page(), 1);
    assert_eq!(s.page_items().len(), PAGE_SIZE);

    s.next_page();
    s.next_page();
    assert_eq!(s.current_page(), 3);
    assert_eq!(s.page_items().len(), 5);

    // No-op at the last page.
    s.next_page();
    assert_eq!(s.current_page(), 3);

    s.previous_page();
    s.previous_page();
    assert_eq!(s.current_page(), 1);

    // No-op at page 1.
    s.previous_page();
    assert_eq!(s.current_page(), 1);
}

#[test]
fn test_empty_results_enter_empty_state() {
    let mut s = session();
    s.input("abc", 0);
    let (_, generation) = s.poll_due(DEBOUNCE_MS).unwrap();
    s.apply_success(generation, Vec::new());

    assert_eq!(*s.phase(), SearchPhase::Empty);
    assert_eq!(s.total_pages(), 0);
    assert!(s.page_items().is_empty());
}

#[test]
fn test_error_discards_prior_results() {
    let mut s = session();
    s.input("abc", 0);
    let (_, generation) = s.poll_due(DEBOUNCE_MS).unwrap();
    s.apply_success(generation, (0..25).collect());

    s.input("abcd", 10_000);
    let (_, generation) = s.poll_due(10_000 + DEBOUNCE_MS).unwrap();
    s.apply_error(generation, "An error occurred".to_string());

    assert_eq!(*s.phase(), SearchPhase::Error("An error occurred".to_string()));
    assert!(s.results().is_empty());
    assert!(s.page_items().is_empty());
}

#[test]
fn test_stale_response_cannot_overwrite_fresher_one() {
    let mut s = session();

    // First fetch dispatched...
    s.input("abc", 0);
    let (_, old_generation) = s.poll_due(DEBOUNCE_MS).unwrap();

    // ...then the user types again and a second fetch is dispatched.
    s.input("abcdef", 5_000);
    let (_, new_generation) = s.poll_due(5_000 + DEBOUNCE_MS).unwrap();

    // The fresher response lands first.
    s.apply_success(new_generation, vec![42]);
    // The slow, stale response must be dropped.
    s.apply_success(old_generation, vec![1, 2, 3]);

    assert_eq!(s.results(), &[42]);
    assert_eq!(*s.phase(), SearchPhase::Success);

    // A stale error is dropped too.
    s.apply_error(old_generation, "late failure".to_string());
    assert_eq!(*s.phase(), SearchPhase::Success);
}

fn repo_item(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("repo-{}", id),
        "full_name": format!("octocat/repo-{}", id),
        "owner": { "id": 1, "login": "octocat", "avatar_url": "https://a", "type": "User" },
        "stargazers_count": 1,
    })
}

#[tokio::test]
async fn test_manager_tick_fetches_once_per_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "rust cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "incomplete_results": false,
            "items": [repo_item(1), repo_item(2)],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Arc::new(GitHubGateway::with_base_url(&server.uri()));
    let mut manager = RepositorySearchManager::new(gateway);

    manager.input("rust cli", 0);
    // Window not yet elapsed: no fetch.
    assert!(!manager.tick(DEBOUNCE_MS - 1).await);
    assert_eq!(*manager.phase(), SearchPhase::Debouncing);

    assert!(manager.tick(DEBOUNCE_MS).await);
    assert_eq!(*manager.phase(), SearchPhase::Success);
    assert_eq!(manager.page_items().len(), 2);

    // Consumed window: further ticks do nothing.
    assert!(!manager.tick(DEBOUNCE_MS * 10).await);
}

#[tokio::test]
async fn test_manager_propagates_gateway_message_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let gateway = Arc::new(GitHubGateway::with_base_url(&server.uri()));
    let mut manager = RepositorySearchManager::new(gateway);

    manager.input("rust cli", 0);
    manager.tick(DEBOUNCE_MS).await;

    assert_eq!(
        *manager.phase(),
        SearchPhase::Error("API rate limit exceeded. Please try again later.".to_string())
    );
}
