// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation
// - Thread-safe access

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{StoreError, StoreResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Pool sizing and lock-wait settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    pub max_size: u32,
    pub busy_timeout_ms: u32,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_size: 8,
            busy_timeout_ms: 5000,
        }
    }
}

/// SQL function folding text with Unicode lowercase rules.
/// SQLite's built-in `lower()` and `LIKE` only fold ASCII.
pub const UNICODE_LOWER_FN: &str = "unicode_lower";

/// Register the crate's SQL functions on `conn`
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

/// Default database file location
///
/// Path structure: {APP_DATA}/moviescore/moviescore.db
pub fn default_database_path() -> StoreResult<PathBuf> {
    let app_data_dir = dirs::data_dir().ok_or_else(|| {
        StoreError::Unavailable("Could not determine app data directory".to_string())
    })?;

    Ok(app_data_dir.join("moviescore").join("moviescore.db"))
}

/// Create a connection pool over the database file at `db_path`
///
/// Every pooled connection gets:
/// - Foreign keys enabled (scores reference movies and users)
/// - WAL journal for concurrent readers
/// - A busy timeout so competing writers wait instead of failing
pub fn create_connection_pool(db_path: &Path, options: PoolOptions) -> StoreResult<ConnectionPool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!(
                    "Could not create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let busy_timeout_ms = options.busy_timeout_ms;
    let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        conn.busy_timeout(Duration::from_millis(u64::from(busy_timeout_ms)))?;
        register_functions(conn)
    });

    let pool = Pool::builder()
        .max_size(options.max_size.max(1))
        .build(manager)?;

    log::debug!(
        "opened sqlite pool at {} (max_size={})",
        db_path.display(),
        options.max_size
    );
    Ok(pool)
}

/// Create a single-connection pool over a private in-memory database
///
/// Each in-memory connection is its own database, so the pool is capped
/// at one connection. Intended for tests.
pub fn create_test_pool() -> StoreResult<ConnectionPool> {
    let manager = SqliteConnectionManager::memory().with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        register_functions(conn)
    });

    let pool = Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_secs(5))
        .build(manager)?;
    Ok(pool)
}

/// Get a connection from the pool
pub fn get_connection(pool: &ConnectionPool) -> StoreResult<PooledConn> {
    pool.get()
        .map_err(|e| StoreError::Pool(format!("Failed to get database connection: {}", e)))
}

/// Create a standalone connection (for testing)
///
/// This creates an in-memory database, useful for unit tests.
pub fn create_test_connection() -> StoreResult<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    register_functions(&conn)?;
    Ok(conn)
}
