// src/repositories/store.rs
//
// Transaction boundary over the repositories.
//
// A service opens one transaction per operation, works through the
// repository views it hands out, and commits. Dropping an uncommitted
// transaction rolls it back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use uuid::Uuid;

use crate::db::{get_connection, ConnectionPool, PooledConn};
use crate::error::StoreResult;
use crate::repositories::movie_repository::{MovieRepository, SqliteMovieRepository};
use crate::repositories::score_repository::{ScoreRepository, SqliteScoreRepository};
use crate::repositories::user_repository::{SqliteUserRepository, UserRepository};

/// Persistence gateway entry point
pub trait Store: Send + Sync {
    /// Open a transaction for lookups only
    fn read(&self) -> StoreResult<Box<dyn Transaction + '_>>;

    /// Open a transaction that holds the writer lock from the start,
    /// so concurrent writers are serialized
    fn write(&self) -> StoreResult<Box<dyn Transaction + '_>>;
}

/// An open unit of work
pub trait Transaction {
    fn movies(&self) -> Box<dyn MovieRepository + '_>;
    fn scores(&self) -> Box<dyn ScoreRepository + '_>;
    fn users(&self) -> Box<dyn UserRepository + '_>;

    /// Make every change visible to later transactions
    fn commit(self: Box<Self>) -> StoreResult<()>;
}

// ============================================================================
// SQLITE
// ============================================================================

pub struct SqliteStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteStore {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    fn begin(&self, statement: &str) -> StoreResult<Box<dyn Transaction + '_>> {
        let conn = get_connection(&self.pool)?;
        conn.execute_batch(statement)?;
        Ok(Box::new(SqliteTransaction {
            conn,
            finished: false,
        }))
    }
}

impl Store for SqliteStore {
    fn read(&self) -> StoreResult<Box<dyn Transaction + '_>> {
        self.begin("BEGIN DEFERRED")
    }

    fn write(&self) -> StoreResult<Box<dyn Transaction + '_>> {
        self.begin("BEGIN IMMEDIATE")
    }
}

struct SqliteTransaction {
    conn: PooledConn,
    finished: bool,
}

impl Transaction for SqliteTransaction {
    fn movies(&self) -> Box<dyn MovieRepository + '_> {
        Box::new(SqliteMovieRepository::new(&self.conn))
    }

    fn scores(&self) -> Box<dyn ScoreRepository + '_> {
        Box::new(SqliteScoreRepository::new(&self.conn))
    }

    fn users(&self) -> Box<dyn UserRepository + '_> {
        Box::new(SqliteUserRepository::new(&self.conn))
    }

    fn commit(mut self: Box<Self>) -> StoreResult<()> {
        self.conn.execute_batch("COMMIT")?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SqliteTransaction {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                log::warn!("rollback failed: {}", e);
            }
        }
    }
}

// ============================================================================
// ROW DECODING HELPERS
// ============================================================================

fn conversion_failure(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

pub(crate) fn parse_uuid(idx: usize, raw: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| conversion_failure(idx, format!("Invalid UUID '{}': {}", raw, e)))
}

pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_failure(idx, format!("Invalid timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use rusqlite::params;
    use tempfile::TempDir;

    use crate::db::{create_connection_pool, initialize_database, PoolOptions};
    use crate::domain::{Movie, Score};
    use crate::error::StoreError;

    fn setup(options: PoolOptions) -> (TempDir, SqliteStore, Uuid) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("movies.db"), options).unwrap();
        let user_id = Uuid::new_v4();
        {
            let conn = get_connection(&pool).unwrap();
            initialize_database(&conn).unwrap();
            conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, 'alex@gmail.com', 'x')",
                params![user_id.to_string()],
            )
            .unwrap();
        }
        (dir, SqliteStore::new(Arc::new(pool)), user_id)
    }

    fn count(store: &SqliteStore, table: &str) -> i64 {
        let conn = get_connection(store.pool()).unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_dropped_write_leaves_no_rows() {
        let (_dir, store, user_id) = setup(PoolOptions::default());
        let movie = Movie::new("The Witcher".into(), 2019, None, None);

        {
            let tx = store.write().unwrap();
            tx.movies().save(&movie).unwrap();
            tx.scores().save_and_flush(&Score::new(movie.id, user_id, 4.0)).unwrap();
        }

        assert_eq!(count(&store, "movies"), 0);
        assert_eq!(count(&store, "scores"), 0);
        let tx = store.read().unwrap();
        assert!(!tx.movies().exists_by_id(movie.id).unwrap());
    }

    #[test]
    fn test_committed_write_is_visible_to_later_reads() {
        let (_dir, store, user_id) = setup(PoolOptions::default());
        let movie = Movie::new("The Witcher".into(), 2019, None, None);

        let tx = store.write().unwrap();
        tx.movies().save(&movie).unwrap();
        tx.scores().save_and_flush(&Score::new(movie.id, user_id, 4.0)).unwrap();
        tx.commit().unwrap();

        let tx = store.read().unwrap();
        let found = tx.movies().find_by_id(movie.id).unwrap().unwrap();
        assert_eq!(found.scores.len(), 1);
        assert_eq!(found.scores[0].value, 4.0);
    }

    #[test]
    fn test_second_writer_fails_after_busy_timeout() {
        let (_dir, store, _) = setup(PoolOptions {
            max_size: 2,
            busy_timeout_ms: 50,
        });

        let first = store.write().unwrap();
        first
            .movies()
            .save(&Movie::new("The Witcher".into(), 2019, None, None))
            .unwrap();

        assert!(matches!(store.write(), Err(StoreError::Database(_))));

        drop(first);
        let second = store.write().unwrap();
        second.commit().unwrap();
        assert_eq!(count(&store, "movies"), 0);
    }

    #[test]
    fn test_second_writer_waits_for_first_commit() {
        let (_dir, store, _) = setup(PoolOptions::default());
        let store = Arc::new(store);
        let movie = Movie::new("The Witcher".into(), 2019, None, None);
        let (locked_tx, locked_rx) = mpsc::channel();

        let holder = {
            let store = store.clone();
            let movie = movie.clone();
            thread::spawn(move || {
                let tx = store.write().unwrap();
                locked_tx.send(()).unwrap();
                thread::sleep(Duration::from_millis(100));
                tx.movies().save(&movie).unwrap();
                tx.commit().unwrap();
            })
        };

        locked_rx.recv().unwrap();
        let tx = store.write().unwrap();
        // Only reachable once the holder has committed
        assert!(tx.movies().exists_by_id(movie.id).unwrap());
        tx.commit().unwrap();
        holder.join().unwrap();
    }
}
