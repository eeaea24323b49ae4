//! Unit tests for the database layer: migrations, idempotency, schema.

use gitpulse::database::migrations::{self, CURRENT_SCHEMA_VERSION};
use gitpulse::database::Database;

#[test]
fn test_open_in_memory_runs_migrations() {
    let db = Database::open_in_memory().unwrap();
    let version = migrations::get_schema_version(db.connection());
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().unwrap();
    // Running again must not fail or bump the version.
    migrations::run_all(db.connection()).unwrap();
    migrations::run_all(db.connection()).unwrap();
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_core_tables_exist() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();

    for table in ["favorite_repositories", "favorite_users", "credentials"] {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = ?1",
                rusqlite::params![table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1, "table {} should exist", table);
    }
}

#[test]
fn test_favorite_repositories_has_topics_column() {
    let db = Database::open_in_memory().unwrap();
    // V2 guarantees the column regardless of the schema the DB started from.
    db.connection()
        .prepare("SELECT topics FROM favorite_repositories LIMIT 0")
        .unwrap();
}

#[test]
fn test_open_on_disk_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gitpulse.db");

    {
        let db = Database::open(&path).unwrap();
        db.connection()
            .execute(
                "INSERT INTO favorite_users (id, login, avatar_url, followers, saved_at) \
                 VALUES (1, 'octocat', 'https://a', 10, 0)",
                [],
            )
            .unwrap();
    }

    let db = Database::open(&path).unwrap();
    let count: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM favorite_users", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
