// src/db/migrations.rs
//
// Database schema initialization and migrations
//
// PRINCIPLES:
// - Explicit schema versions
// - No automatic migrations
// - Clear error messages
// - Idempotent operations

use rusqlite::Connection;

use crate::error::{StoreError, StoreResult};

/// Current schema version
/// Increment this when adding migrations
const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This function:
/// 1. Checks current schema version
/// 2. Applies necessary migrations
/// 3. Updates version tracking
///
/// Safe to call multiple times (idempotent).
pub fn initialize_database(conn: &Connection) -> StoreResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        apply_initial_schema(conn)?;
        set_schema_version(conn, CURRENT_SCHEMA_VERSION)?;
        log::info!("database schema initialized at version {}", CURRENT_SCHEMA_VERSION);
    } else if current_version < CURRENT_SCHEMA_VERSION {
        return Err(StoreError::Unavailable(format!(
            "Schema version {} is outdated. Expected {}. Manual migration required.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    } else if current_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::Unavailable(format!(
            "Schema version {} is newer than supported {}. Update the application.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// Get current schema version
/// Returns 0 if schema_version table doesn't exist (fresh database)
fn get_schema_version(conn: &Connection) -> StoreResult<i32> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> StoreResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [version],
    )?;

    Ok(())
}

/// Apply initial schema (version 1) from the embedded schema.sql
fn apply_initial_schema(conn: &Connection) -> StoreResult<()> {
    let schema = include_str!("../../schema.sql");

    conn.execute_batch(schema).map_err(|e| {
        StoreError::Unavailable(format!("Failed to apply initial schema: {}", e))
    })?;

    Ok(())
}

/// Load the demo catalogue and accounts
///
/// Only runs against an empty database (no movies and no users), so it
/// is safe to call on every start. Returns whether anything was inserted.
pub fn seed_demo_data(conn: &Connection) -> StoreResult<bool> {
    let populated: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM movies) OR EXISTS(SELECT 1 FROM users)",
        [],
        |row| row.get(0),
    )?;

    if populated {
        return Ok(false);
    }

    // Rolled back on drop if any statement fails
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(include_str!("../../seed.sql"))
        .map_err(|e| StoreError::Unavailable(format!("Failed to apply seed data: {}", e)))?;
    tx.commit()?;

    log::info!("demo data seeded");
    Ok(true)
}

/// Verify database integrity
///
/// Runs SQLite's integrity check. Should be called periodically.
pub fn verify_database_integrity(conn: &Connection) -> StoreResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    if result != "ok" {
        return Err(StoreError::Unavailable(format!(
            "Database integrity check failed: {}",
            result
        )));
    }

    Ok(())
}

/// Get database statistics
///
/// Returns useful info for debugging and monitoring
pub fn get_database_stats(conn: &Connection) -> StoreResult<DatabaseStats> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;

    let movie_count: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
    let score_count: i64 = conn.query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))?;
    let user_count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;

    Ok(DatabaseStats {
        size_bytes: page_count * page_size,
        page_count,
        page_size,
        movie_count,
        score_count,
        user_count,
    })
}

/// Database statistics
#[derive(Debug)]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub page_count: i64,
    pub page_size: i64,
    pub movie_count: i64,
    pub score_count: i64,
    pub user_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_connection;

    #[test]
    fn test_initialize_fresh_database() {
        let conn = create_test_connection().unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        initialize_database(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), 1);

        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 6, "Expected 6 tables, got {}", table_count);
    }

    #[test]
    fn test_initialize_idempotent() {
        let conn = create_test_connection().unwrap();

        initialize_database(&conn).unwrap();
        initialize_database(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn test_score_requires_existing_movie() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO scores (movie_id, user_id, value) VALUES ('no-movie', 'no-user', 4.0)",
            [],
        );

        assert!(result.is_err(), "Foreign key constraint should have been violated");
    }

    #[test]
    fn test_seed_runs_once() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        assert!(seed_demo_data(&conn).unwrap());
        assert!(!seed_demo_data(&conn).unwrap());

        let stats = get_database_stats(&conn).unwrap();
        assert_eq!(stats.movie_count, 4);
        assert_eq!(stats.user_count, 2);
        assert_eq!(stats.score_count, 0);
    }

    #[test]
    fn test_failed_seed_is_rolled_back() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        conn.execute_batch("DROP TABLE user_roles").unwrap();

        assert!(matches!(seed_demo_data(&conn), Err(StoreError::Unavailable(_))));

        assert!(conn.is_autocommit());
        let users: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(users, 0);
    }

    #[test]
    fn test_database_stats() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        let stats = get_database_stats(&conn).unwrap();

        assert!(stats.size_bytes > 0);
        assert_eq!(stats.movie_count, 0);
        assert_eq!(stats.user_count, 0);
    }

    #[test]
    fn test_integrity_check() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        verify_database_integrity(&conn).unwrap();
    }
}
