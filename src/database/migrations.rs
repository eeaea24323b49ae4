//! Schema migrations for the Gitpulse SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Migrations are versioned — each runs exactly once and is recorded in
/// the `schema_version` table. Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    // Enable WAL and foreign keys (always, not versioned)
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: favorites and credentials")?;
    }

    if current < 2 {
        migration_v2(conn)?;
        record_version(conn, 2, "Add topics to favorite_repositories")?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: Create all core tables.
///
/// Favorites rows are keyed by the remote numeric id so a second save of
/// the same entity replaces the first.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS favorite_repositories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            full_name TEXT NOT NULL,
            owner_login TEXT NOT NULL,
            owner_avatar_url TEXT NOT NULL,
            description TEXT,
            language TEXT,
            stargazers_count INTEGER NOT NULL DEFAULT 0,
            forks_count INTEGER NOT NULL DEFAULT 0,
            topics TEXT NOT NULL DEFAULT '[]',
            saved_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_favorite_repositories_saved_at
            ON favorite_repositories(saved_at);

        CREATE TABLE IF NOT EXISTS favorite_users (
            id INTEGER PRIMARY KEY,
            login TEXT NOT NULL,
            avatar_url TEXT NOT NULL,
            bio TEXT,
            location TEXT,
            followers INTEGER NOT NULL DEFAULT 0,
            saved_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_favorite_users_saved_at
            ON favorite_users(saved_at);

        CREATE TABLE IF NOT EXISTS credentials (
            id TEXT PRIMARY KEY,
            ciphertext BLOB NOT NULL,
            nonce BLOB NOT NULL,
            auth_tag BLOB NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        ",
    )
}

/// V2: Add the topics column for databases created before V1 included it.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    if conn
        .prepare("SELECT topics FROM favorite_repositories LIMIT 0")
        .is_err()
    {
        let _ = conn.execute_batch(
            "ALTER TABLE favorite_repositories ADD COLUMN topics TEXT NOT NULL DEFAULT '[]';",
        );
    }
    Ok(())
}
