//! Unit tests for the GitHub data gateway.
//!
//! Exercises the cache-before-network contract, cache expiry, the
//! cache-bypassing counted search, and the failure classification against
//! a mock HTTP server.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gitpulse::services::github_gateway::GitHubGateway;
use gitpulse::services::response_cache::{CacheClock, CACHE_TTL_MS};
use gitpulse::types::errors::GatewayError;

fn manual_clock(start: i64) -> (Arc<AtomicI64>, CacheClock) {
    let time = Arc::new(AtomicI64::new(start));
    let handle = time.clone();
    let clock: CacheClock = Arc::new(move || handle.load(Ordering::SeqCst));
    (time, clock)
}

fn user_body(id: u64, login: &str) -> serde_json::Value {
    json!({
        "id": id,
        "login": login,
        "avatar_url": format!("https://avatars.example/{}", id),
        "bio": "makes things",
        "public_repos": 8,
        "followers": 100,
        "following": 10,
    })
}

fn repo_body(id: u64, full_name: &str) -> serde_json::Value {
    let name = full_name.split('/').nth(1).unwrap_or(full_name);
    json!({
        "id": id,
        "name": name,
        "full_name": full_name,
        "owner": { "id": 1, "login": "octocat", "avatar_url": "https://a", "type": "User" },
        "description": "a repository",
        "language": "Rust",
        "stargazers_count": 42,
        "forks_count": 7,
        "watchers_count": 42,
        "open_issues_count": 3,
        "topics": ["tools"],
    })
}

fn repo_search_body(total: u64, repos: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "total_count": total, "incomplete_results": false, "items": repos })
}

#[tokio::test]
async fn test_user_details_served_from_cache_within_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(1, "octocat")))
        .expect(1)
        .mount(&server)
        .await;

    let (time, clock) = manual_clock(1_000);
    let gateway = GitHubGateway::with_base_url_and_clock(&server.uri(), clock);

    let first = gateway.get_user_details("octocat").await.unwrap();
    time.store(1_000 + CACHE_TTL_MS - 1, Ordering::SeqCst);
    let second = gateway.get_user_details("octocat").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.login, "octocat");
}

#[tokio::test]
async fn test_user_details_refetched_after_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(1, "octocat")))
        .expect(2)
        .mount(&server)
        .await;

    let (time, clock) = manual_clock(0);
    let gateway = GitHubGateway::with_base_url_and_clock(&server.uri(), clock);

    gateway.get_user_details("octocat").await.unwrap();
    time.store(CACHE_TTL_MS + 1, Ordering::SeqCst);
    gateway.get_user_details("octocat").await.unwrap();
}

#[tokio::test]
async fn test_repository_search_cached_under_raw_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "rust http"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_search_body(
            1,
            vec![repo_body(10, "octocat/rust-http")],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = GitHubGateway::with_base_url(&server.uri());
    let first = gateway.search_repositories("rust http").await.unwrap();
    let second = gateway.search_repositories("rust http").await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second[0].full_name, "octocat/rust-http");
}

#[tokio::test]
async fn test_counted_search_bypasses_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "language:\"Rust\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_search_body(1234, vec![])))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = GitHubGateway::with_base_url(&server.uri());
    let first = gateway
        .search_repositories_with_count("language:\"Rust\"", 1, 1)
        .await
        .unwrap();
    let second = gateway
        .search_repositories_with_count("language:\"Rust\"", 1, 1)
        .await
        .unwrap();

    assert_eq!(first.total_count, 1234);
    assert_eq!(second.total_count, 1234);
}

#[tokio::test]
async fn test_user_repositories_cached_under_derived_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([repo_body(10, "octocat/hello-world")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/other/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = GitHubGateway::with_base_url(&server.uri());
    gateway.get_user_repositories("octocat").await.unwrap();
    gateway.get_user_repositories("octocat").await.unwrap();
    // A different username is a different key, so it fetches.
    let other = gateway.get_user_repositories("other").await.unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_rate_limit_classification_on_429() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let gateway = GitHubGateway::with_base_url(&server.uri());
    let err = gateway.get_user_details("octocat").await.unwrap_err();

    assert!(matches!(err, GatewayError::RateLimited));
    assert_eq!(
        err.to_string(),
        "API rate limit exceeded. Please try again later."
    );
}

#[tokio::test]
async fn test_forbidden_with_rate_limit_body_classified_as_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "API rate limit exceeded for 1.2.3.4",
        })))
        .mount(&server)
        .await;

    let gateway = GitHubGateway::with_base_url(&server.uri());
    let err = gateway.get_user_details("octocat").await.unwrap_err();
    assert!(matches!(err, GatewayError::RateLimited));
}

#[tokio::test]
async fn test_server_error_maps_to_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = GitHubGateway::with_base_url(&server.uri());
    let err = gateway.get_user_details("octocat").await.unwrap_err();

    assert!(matches!(err, GatewayError::Api(_)));
    assert_eq!(err.to_string(), "An error occurred");
}

#[tokio::test]
async fn test_not_found_classification() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let gateway = GitHubGateway::with_base_url(&server.uri());
    let err = gateway.get_repository("octocat", "missing").await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(_)));
}

#[tokio::test]
async fn test_malformed_body_maps_to_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let gateway = GitHubGateway::with_base_url(&server.uri());
    let err = gateway.get_user_details("octocat").await.unwrap_err();
    assert!(matches!(err, GatewayError::Parse(_)));
}

#[tokio::test]
async fn test_failed_fetch_does_not_poison_cache() {
    let server = MockServer::start().await;
    // First call fails, second succeeds; the failure must not be cached.
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(1, "octocat")))
        .mount(&server)
        .await;

    let gateway = GitHubGateway::with_base_url(&server.uri());
    assert!(gateway.get_user_details("octocat").await.is_err());
    let user = gateway.get_user_details("octocat").await.unwrap();
    assert_eq!(user.login, "octocat");
}
