//! Local favorites store for Gitpulse.
//!
//! Persists user-pinned repositories and accounts in SQLite, keyed by the
//! remote numeric id so a repeated save replaces the prior row instead of
//! duplicating it. Mutations bump a `watch` revision channel; screens
//! subscribe to recompute their per-item favorite flags without re-fetching
//! search results.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;
use tokio::sync::watch;

use crate::database::connection::Database;
use crate::types::errors::FavoriteError;
use crate::types::favorite::{FavoriteRepository, FavoriteUser};
use crate::types::github::{RemoteRepository, RemoteUser};

/// Trait defining favorites store operations.
pub trait FavoritesStoreTrait {
    fn save_repository(&self, repo: &RemoteRepository) -> Result<(), FavoriteError>;
    fn remove_repository(&self, id: u64) -> Result<(), FavoriteError>;
    /// Flips the favorite state. Returns true when the entity is now favorited.
    fn toggle_repository(&self, repo: &RemoteRepository) -> Result<bool, FavoriteError>;
    fn is_repository_favorite(&self, id: u64) -> Result<bool, FavoriteError>;
    fn list_repositories(&self) -> Result<Vec<FavoriteRepository>, FavoriteError>;

    fn save_user(&self, user: &RemoteUser) -> Result<(), FavoriteError>;
    fn remove_user(&self, id: u64) -> Result<(), FavoriteError>;
    fn toggle_user(&self, user: &RemoteUser) -> Result<bool, FavoriteError>;
    fn is_user_favorite(&self, id: u64) -> Result<bool, FavoriteError>;
    fn list_users(&self) -> Result<Vec<FavoriteUser>, FavoriteError>;

    /// Revision stream bumped on every successful mutation.
    fn subscribe(&self) -> watch::Receiver<u64>;
}

/// Favorites store backed by SQLite.
pub struct FavoritesStore {
    db: Arc<Database>,
    changes: watch::Sender<u64>,
}

impl FavoritesStore {
    pub fn new(db: Arc<Database>) -> Self {
        let (changes, _) = watch::channel(0);
        Self { db, changes }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn bump(&self) {
        self.changes.send_modify(|revision| *revision += 1);
    }

    fn row_to_favorite_repository(row: &rusqlite::Row) -> rusqlite::Result<FavoriteRepository> {
        Ok(FavoriteRepository {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
            full_name: row.get(2)?,
            owner_login: row.get(3)?,
            owner_avatar_url: row.get(4)?,
            description: row.get(5)?,
            language: row.get(6)?,
            stargazers_count: row.get(7)?,
            forks_count: row.get(8)?,
            topics: serde_json::from_str(&row.get::<_, String>(9)?).unwrap_or_default(),
            saved_at: row.get(10)?,
        })
    }

    fn row_to_favorite_user(row: &rusqlite::Row) -> rusqlite::Result<FavoriteUser> {
        Ok(FavoriteUser {
            id: row.get::<_, i64>(0)? as u64,
            login: row.get(1)?,
            avatar_url: row.get(2)?,
            bio: row.get(3)?,
            location: row.get(4)?,
            followers: row.get(5)?,
            saved_at: row.get(6)?,
        })
    }
}

impl FavoritesStoreTrait for FavoritesStore {
    /// Saves a repository favorite. An existing row for the same remote id
    /// is replaced (last-write-wins).
    fn save_repository(&self, repo: &RemoteRepository) -> Result<(), FavoriteError> {
        let topics = serde_json::to_string(&repo.topics)
            .map_err(|e| FavoriteError::Serialization(e.to_string()))?;

        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO favorite_repositories \
                 (id, name, full_name, owner_login, owner_avatar_url, description, language, \
                  stargazers_count, forks_count, topics, saved_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    repo.id as i64,
                    repo.name,
                    repo.full_name,
                    repo.owner.login,
                    repo.owner.avatar_url,
                    repo.description,
                    repo.language,
                    repo.stargazers_count,
                    repo.forks_count,
                    topics,
                    Self::now(),
                ],
            )
            .map_err(|e| FavoriteError::Database(e.to_string()))?;

        self.bump();
        Ok(())
    }

    /// Removes a repository favorite. Removing an id that was never saved
    /// is a no-op, which keeps concurrent toggles idempotent.
    fn remove_repository(&self, id: u64) -> Result<(), FavoriteError> {
        let affected = self
            .db
            .connection()
            .execute(
                "DELETE FROM favorite_repositories WHERE id = ?1",
                params![id as i64],
            )
            .map_err(|e| FavoriteError::Database(e.to_string()))?;

        if affected > 0 {
            self.bump();
        }
        Ok(())
    }

    fn toggle_repository(&self, repo: &RemoteRepository) -> Result<bool, FavoriteError> {
        if self.is_repository_favorite(repo.id)? {
            self.remove_repository(repo.id)?;
            Ok(false)
        } else {
            self.save_repository(repo)?;
            Ok(true)
        }
    }

    fn is_repository_favorite(&self, id: u64) -> Result<bool, FavoriteError> {
        let count: i64 = self
            .db
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM favorite_repositories WHERE id = ?1",
                params![id as i64],
                |row| row.get(0),
            )
            .map_err(|e| FavoriteError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Lists repository favorites, most recently saved first.
    fn list_repositories(&self) -> Result<Vec<FavoriteRepository>, FavoriteError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, name, full_name, owner_login, owner_avatar_url, description, \
                 language, stargazers_count, forks_count, topics, saved_at \
                 FROM favorite_repositories ORDER BY saved_at DESC, id DESC",
            )
            .map_err(|e| FavoriteError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_favorite_repository)
            .map_err(|e| FavoriteError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| FavoriteError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    /// Saves a user favorite, replacing any existing row for the same id.
    fn save_user(&self, user: &RemoteUser) -> Result<(), FavoriteError> {
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO favorite_users \
                 (id, login, avatar_url, bio, location, followers, saved_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user.id as i64,
                    user.login,
                    user.avatar_url,
                    user.bio,
                    user.location,
                    user.followers,
                    Self::now(),
                ],
            )
            .map_err(|e| FavoriteError::Database(e.to_string()))?;

        self.bump();
        Ok(())
    }

    fn remove_user(&self, id: u64) -> Result<(), FavoriteError> {
        let affected = self
            .db
            .connection()
            .execute(
                "DELETE FROM favorite_users WHERE id = ?1",
                params![id as i64],
            )
            .map_err(|e| FavoriteError::Database(e.to_string()))?;

        if affected > 0 {
            self.bump();
        }
        Ok(())
    }

    fn toggle_user(&self, user: &RemoteUser) -> Result<bool, FavoriteError> {
        if self.is_user_favorite(user.id)? {
            self.remove_user(user.id)?;
            Ok(false)
        } else {
            self.save_user(user)?;
            Ok(true)
        }
    }

    fn is_user_favorite(&self, id: u64) -> Result<bool, FavoriteError> {
        let count: i64 = self
            .db
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM favorite_users WHERE id = ?1",
                params![id as i64],
                |row| row.get(0),
            )
            .map_err(|e| FavoriteError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Lists user favorites, most recently saved first.
    fn list_users(&self) -> Result<Vec<FavoriteUser>, FavoriteError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, login, avatar_url, bio, location, followers, saved_at \
                 FROM favorite_users ORDER BY saved_at DESC, id DESC",
            )
            .map_err(|e| FavoriteError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_favorite_user)
            .map_err(|e| FavoriteError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| FavoriteError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
