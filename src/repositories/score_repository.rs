// src/repositories/score_repository.rs
//
// Score persistence, keyed by (movie, user)

use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::domain::{Score, ScoreKey};
use crate::error::StoreResult;
use crate::repositories::store::parse_uuid;

pub trait ScoreRepository {
    /// Insert or overwrite the score for its (movie, user) key.
    /// The write is visible to later reads in the same transaction.
    fn save_and_flush(&self, score: &Score) -> StoreResult<Score>;

    fn find_by_id(&self, key: ScoreKey) -> StoreResult<Option<Score>>;

    fn find_by_movie(&self, movie_id: Uuid) -> StoreResult<Vec<Score>>;
}

pub struct SqliteScoreRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteScoreRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_score(row: &Row) -> rusqlite::Result<Score> {
        let movie_id: String = row.get("movie_id")?;
        let user_id: String = row.get("user_id")?;
        Ok(Score {
            movie_id: parse_uuid(0, &movie_id)?,
            user_id: parse_uuid(1, &user_id)?,
            value: row.get("value")?,
        })
    }
}

impl ScoreRepository for SqliteScoreRepository<'_> {
    fn save_and_flush(&self, score: &Score) -> StoreResult<Score> {
        self.conn.execute(
            "INSERT INTO scores (movie_id, user_id, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(movie_id, user_id) DO UPDATE SET value = excluded.value",
            params![
                score.movie_id.to_string(),
                score.user_id.to_string(),
                score.value
            ],
        )?;

        Ok(score.clone())
    }

    fn find_by_id(&self, key: ScoreKey) -> StoreResult<Option<Score>> {
        let mut stmt = self.conn.prepare(
            "SELECT movie_id, user_id, value FROM scores WHERE movie_id = ?1 AND user_id = ?2",
        )?;

        match stmt.query_row(
            params![key.movie_id.to_string(), key.user_id.to_string()],
            Self::row_to_score,
        ) {
            Ok(score) => Ok(Some(score)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_movie(&self, movie_id: Uuid) -> StoreResult<Vec<Score>> {
        let mut stmt = self.conn.prepare(
            "SELECT movie_id, user_id, value FROM scores WHERE movie_id = ?1 ORDER BY rowid",
        )?;

        let scores = stmt
            .query_map(params![movie_id.to_string()], Self::row_to_score)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(scores)
    }
}
