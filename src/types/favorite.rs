use serde::{Deserialize, Serialize};

/// A user-pinned repository, persisted locally.
///
/// Keyed by the remote numeric id: saving an existing id replaces the
/// prior row (last-write-wins), never duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner_login: String,
    pub owner_avatar_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub topics: Vec<String>,
    /// Epoch seconds at which the favorite was saved.
    pub saved_at: i64,
}

/// A user-pinned GitHub account, persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteUser {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub followers: u32,
    pub saved_at: i64,
}
