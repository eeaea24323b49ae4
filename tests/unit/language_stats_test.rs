//! Unit tests for the language popularity statistics and their documented
//! fallback behavior.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gitpulse::services::github_gateway::GitHubGateway;
use gitpulse::services::language_stats::{
    fallback_distribution, LanguageStatsService, TRACKED_LANGUAGES,
};

#[test]
fn test_fallback_distribution_covers_all_languages_and_sums_to_100() {
    let shares = fallback_distribution();
    assert_eq!(shares.len(), TRACKED_LANGUAGES.len());

    let total: f64 = shares.iter().map(|s| s.percent).sum();
    assert!((total - 100.0).abs() < 0.01, "total was {}", total);
}

#[tokio::test]
async fn test_unreachable_gateway_falls_back_to_hardcoded_distribution() {
    // Port 9 (discard) is never listening; every count fails fast.
    let gateway = Arc::new(GitHubGateway::with_base_url("http://127.0.0.1:9"));
    let stats = LanguageStatsService::new(gateway);

    let shares = stats.popularity().await;
    let fallback = fallback_distribution();
    assert_eq!(shares.len(), fallback.len());
    assert_eq!(shares[0].language, fallback[0].language);
    assert_eq!(shares[0].percent, fallback[0].percent);
}

#[tokio::test]
async fn test_failing_count_midway_falls_back() {
    let server = MockServer::start().await;
    // JavaScript succeeds, everything else 500s.
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "language:\"JavaScript\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1000, "incomplete_results": false, "items": [],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = Arc::new(GitHubGateway::with_base_url(&server.uri()));
    let stats = LanguageStatsService::new(gateway);

    let shares = stats.popularity().await;
    let fallback = fallback_distribution();
    assert_eq!(shares[1].percent, fallback[1].percent);
}

#[tokio::test]
async fn test_live_counts_become_percentages() {
    let server = MockServer::start().await;
    // Every language reports the same count, so shares are uniform.
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 500, "incomplete_results": false, "items": [],
        })))
        .expect(TRACKED_LANGUAGES.len() as u64)
        .mount(&server)
        .await;

    let gateway = Arc::new(GitHubGateway::with_base_url(&server.uri()));
    let stats = LanguageStatsService::new(gateway);

    let shares = stats.popularity().await;
    assert_eq!(shares.len(), TRACKED_LANGUAGES.len());

    let expected = (100.0_f64 / TRACKED_LANGUAGES.len() as f64 * 10.0).round() / 10.0;
    for share in &shares {
        assert_eq!(share.percent, expected);
    }

    let total: f64 = shares.iter().map(|s| s.percent).sum();
    assert!((total - 100.0).abs() < 1.0);
}
