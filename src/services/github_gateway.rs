//! Remote Data Gateway for Gitpulse.
//!
//! Single point of truth for fetching GitHub data over REST. Every
//! read-by-key operation consults a five-minute [`ResponseCache`] before
//! issuing a network call; the counted search variant bypasses caching
//! because its callers want live aggregate numbers.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::services::response_cache::{system_clock, CacheClock, ResponseCache, CACHE_TTL_MS};
use crate::types::errors::GatewayError;
use crate::types::github::{
    CountedRepositorySearch, RemoteRepository, RemoteUser, RepositorySearchResponse,
    UserSearchResponse,
};

/// Production REST endpoint.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Fixed connect/read timeout. No per-call override.
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Results requested per search/list call.
const PER_PAGE: u32 = 30;

/// GitHub data gateway with per-payload-type response caches.
///
/// Concurrent calls for the same key during a cache miss are not
/// deduplicated: both callers issue the HTTP request and the later
/// response supersedes the earlier cache write.
pub struct GitHubGateway {
    http: reqwest::Client,
    base_url: String,
    user_lists: ResponseCache<Vec<RemoteUser>>,
    repo_lists: ResponseCache<Vec<RemoteRepository>>,
    users: ResponseCache<RemoteUser>,
    repos: ResponseCache<RemoteRepository>,
}

impl GitHubGateway {
    /// Creates a gateway against the production GitHub API.
    pub fn new() -> Self {
        Self::with_base_url(GITHUB_API_BASE)
    }

    /// Creates a gateway against an arbitrary base URL (tests).
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_base_url_and_clock(base_url, system_clock())
    }

    /// Creates a gateway with an injected cache clock (tests).
    pub fn with_base_url_and_clock(base_url: &str, clock: CacheClock) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gitpulse/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_lists: ResponseCache::with_clock(CACHE_TTL_MS, clock.clone()),
            repo_lists: ResponseCache::with_clock(CACHE_TTL_MS, clock.clone()),
            users: ResponseCache::with_clock(CACHE_TTL_MS, clock.clone()),
            repos: ResponseCache::with_clock(CACHE_TTL_MS, clock),
        }
    }

    /// Searches GitHub accounts matching `query`. Cached under the raw query.
    pub async fn search_users(&self, query: &str) -> Result<Vec<RemoteUser>, GatewayError> {
        if let Some(hit) = self.user_lists.get(query) {
            debug!(query, "user search served from cache");
            return Ok(hit);
        }

        let response: UserSearchResponse = self
            .get_json(
                "/search/users",
                &[
                    ("q", query.to_string()),
                    ("per_page", PER_PAGE.to_string()),
                    ("page", "1".to_string()),
                ],
                query,
            )
            .await?;

        self.user_lists.insert(query, response.items.clone());
        Ok(response.items)
    }

    /// Searches repositories matching `query`. Cached under the raw query.
    pub async fn search_repositories(
        &self,
        query: &str,
    ) -> Result<Vec<RemoteRepository>, GatewayError> {
        if let Some(hit) = self.repo_lists.get(query) {
            debug!(query, "repository search served from cache");
            return Ok(hit);
        }

        let response: RepositorySearchResponse = self
            .get_json(
                "/search/repositories",
                &[
                    ("q", query.to_string()),
                    ("per_page", PER_PAGE.to_string()),
                    ("page", "1".to_string()),
                ],
                query,
            )
            .await?;

        self.repo_lists.insert(query, response.items.clone());
        Ok(response.items)
    }

    /// Repository search carrying the live total count.
    ///
    /// Never cached: callers use this for aggregate statistics where
    /// freshness matters more than latency.
    pub async fn search_repositories_with_count(
        &self,
        query: &str,
        per_page: u32,
        page: u32,
    ) -> Result<CountedRepositorySearch, GatewayError> {
        let response: RepositorySearchResponse = self
            .get_json(
                "/search/repositories",
                &[
                    ("q", query.to_string()),
                    ("per_page", per_page.to_string()),
                    ("page", page.to_string()),
                ],
                query,
            )
            .await?;

        Ok(CountedRepositorySearch {
            total_count: response.total_count,
            incomplete_results: response.incomplete_results,
            items: response.items,
        })
    }

    /// Fetches a single account profile. Cached under the username.
    pub async fn get_user_details(&self, username: &str) -> Result<RemoteUser, GatewayError> {
        if let Some(hit) = self.users.get(username) {
            debug!(username, "user details served from cache");
            return Ok(hit);
        }

        let user: RemoteUser = self
            .get_json(&format!("/users/{}", username), &[], username)
            .await?;

        self.users.insert(username, user.clone());
        Ok(user)
    }

    /// Lists a user's repositories, most recently updated first.
    /// Cached under `"user_repos_" + username`.
    pub async fn get_user_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<RemoteRepository>, GatewayError> {
        let key = format!("user_repos_{}", username);
        if let Some(hit) = self.repo_lists.get(&key) {
            debug!(username, "user repositories served from cache");
            return Ok(hit);
        }

        let repos: Vec<RemoteRepository> = self
            .get_json(
                &format!("/users/{}/repos", username),
                &[
                    ("per_page", PER_PAGE.to_string()),
                    ("sort", "updated".to_string()),
                    ("direction", "desc".to_string()),
                ],
                username,
            )
            .await?;

        self.repo_lists.insert(&key, repos.clone());
        Ok(repos)
    }

    /// Fetches a single repository. Cached under `"owner/name"`.
    pub async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RemoteRepository, GatewayError> {
        let key = format!("{}/{}", owner, name);
        if let Some(hit) = self.repos.get(&key) {
            debug!(repo = %key, "repository served from cache");
            return Ok(hit);
        }

        let repo: RemoteRepository = self
            .get_json(&format!("/repos/{}/{}", owner, name), &[], &key)
            .await?;

        self.repos.insert(&key, repo.clone());
        Ok(repo)
    }

    /// Repositories created inside the trending window, ordered by stars.
    /// Cached under a window-scoped key.
    pub async fn get_trending_repositories(
        &self,
        window_days: u32,
    ) -> Result<Vec<RemoteRepository>, GatewayError> {
        let key = format!("trending_{}", window_days);
        if let Some(hit) = self.repo_lists.get(&key) {
            debug!(window_days, "trending served from cache");
            return Ok(hit);
        }

        let cutoff = (chrono::Utc::now() - chrono::Duration::days(i64::from(window_days)))
            .format("%Y-%m-%d")
            .to_string();
        let response: RepositorySearchResponse = self
            .get_json(
                "/search/repositories",
                &[
                    ("q", format!("created:>{}", cutoff)),
                    ("sort", "stars".to_string()),
                    ("order", "desc".to_string()),
                    ("per_page", PER_PAGE.to_string()),
                ],
                "trending",
            )
            .await?;

        self.repo_lists.insert(&key, response.items.clone());
        Ok(response.items)
    }

    /// Issues the HTTP call and maps failures to the gateway taxonomy.
    ///
    /// No automatic retry; the typed error propagates to the caller.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_failure(status, &body, what));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Parse(e.to_string()))
    }

    /// Maps a non-success status to the error taxonomy.
    ///
    /// 403 only counts as a rate limit when the body says so, since GitHub uses
    /// the same status for forbidden resources.
    fn classify_failure(status: StatusCode, body: &str, what: &str) -> GatewayError {
        match status.as_u16() {
            404 => GatewayError::NotFound(what.to_string()),
            429 => {
                warn!(%status, "GitHub rate limit hit");
                GatewayError::RateLimited
            }
            403 if body.to_ascii_lowercase().contains("rate limit") => {
                warn!(%status, "GitHub rate limit hit");
                GatewayError::RateLimited
            }
            code => GatewayError::Api(format!("HTTP {}", code)),
        }
    }
}

impl Default for GitHubGateway {
    fn default() -> Self {
        Self::new()
    }
}
