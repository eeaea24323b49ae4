use serde::{Deserialize, Serialize};

/// Owner block embedded in a repository record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    /// "User" or "Organization".
    #[serde(rename = "type", default)]
    pub owner_type: String,
}

/// A GitHub account profile, as returned by `GET /users/{username}`
/// and the user-search endpoint.
///
/// Fetched snapshots are immutable; the client never mutates these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A GitHub repository, as returned by the repo and search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: RepositoryOwner,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub watchers_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    /// Ordered as GitHub returns them.
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Envelope for `GET /search/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<RemoteUser>,
}

/// Envelope for `GET /search/repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositorySearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<RemoteRepository>,
}

/// Search result page with its aggregate metadata, used by callers that
/// need the live total count (statistics screens) rather than the cached
/// item list.
#[derive(Debug, Clone, Serialize)]
pub struct CountedRepositorySearch {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<RemoteRepository>,
}
