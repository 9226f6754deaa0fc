// src/repositories/movie_repository.rs
//
// Movie persistence

use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::domain::page::{Page, PageRequest, Sort, SortDirection, SortField};
use crate::domain::{Movie, Score};
use crate::error::{StoreError, StoreResult};
use crate::repositories::store::{parse_timestamp, parse_uuid};

pub trait MovieRepository {
    /// Full read: the movie with its scores in submission order
    fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Movie>>;

    /// Movie row only, scores are not fetched.
    /// Fails with `EntityNotFound` when the id is unknown.
    fn get_reference_by_id(&self, id: Uuid) -> StoreResult<Movie>;

    fn exists_by_id(&self, id: Uuid) -> StoreResult<bool>;

    /// Insert or update the movie row. Score rows are left untouched.
    fn save(&self, movie: &Movie) -> StoreResult<Movie>;

    /// Fails with `IntegrityViolation` while scores reference the movie
    fn delete_by_id(&self, id: Uuid) -> StoreResult<()>;

    /// Case-insensitive substring match on title. Returned movies carry no scores.
    fn search_by_title(&self, title: &str, request: &PageRequest) -> StoreResult<Page<Movie>>;
}

const MOVIE_COLUMNS: &str =
    "id, title, year, synopsis, image, score, score_count, created_at, updated_at";

pub struct SqliteMovieRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteMovieRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_movie(row: &Row) -> rusqlite::Result<Movie> {
        let id_str: String = row.get("id")?;
        let created_at_str: String = row.get("created_at")?;
        let updated_at_str: String = row.get("updated_at")?;
        let count: i64 = row.get("score_count")?;

        Ok(Movie {
            id: parse_uuid(0, &id_str)?,
            title: row.get("title")?,
            year: row.get("year")?,
            synopsis: row.get("synopsis")?,
            image: row.get("image")?,
            score: row.get("score")?,
            count: count.max(0) as u32,
            scores: Vec::new(),
            created_at: parse_timestamp(7, &created_at_str)?,
            updated_at: parse_timestamp(8, &updated_at_str)?,
        })
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

    fn find_row(&self, id: Uuid) -> StoreResult<Option<Movie>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM movies WHERE id = ?1", MOVIE_COLUMNS))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_movie) {
            Ok(movie) => Ok(Some(movie)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lowercased contains pattern with LIKE wildcards escaped, matched
/// against `unicode_lower(title)`
fn like_pattern(filter: &str) -> String {
    let mut escaped = String::with_capacity(filter.len() + 2);
    escaped.push('%');
    for c in filter.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn order_clause(sort: &Sort) -> String {
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    // NULL scores compare lowest in SQLite ordering
    let column = match sort.field {
        SortField::Title => "unicode_lower(title)",
        SortField::Year => "year",
        SortField::Score => "score",
    };
    format!("{} {}, id ASC", column, direction)
}

impl MovieRepository for SqliteMovieRepository<'_> {
    fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Movie>> {
        let Some(mut movie) = self.find_row(id)? else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT movie_id, user_id, value FROM scores
             WHERE movie_id = ?1
             ORDER BY rowid",
        )?;
        movie.scores = stmt
            .query_map(params![id.to_string()], Self::row_to_score)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(movie))
    }

    fn get_reference_by_id(&self, id: Uuid) -> StoreResult<Movie> {
        self.find_row(id)?
            .ok_or_else(|| StoreError::EntityNotFound(format!("Movie {}", id)))
    }

    fn exists_by_id(&self, id: Uuid) -> StoreResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM movies WHERE id = ?1)",
            params![id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn save(&self, movie: &Movie) -> StoreResult<Movie> {
        self.conn.execute(
            "INSERT INTO movies (
                id, title, year, synopsis, image, score, score_count, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                year = excluded.year,
                synopsis = excluded.synopsis,
                image = excluded.image,
                score = excluded.score,
                score_count = excluded.score_count,
                updated_at = excluded.updated_at",
            params![
                movie.id.to_string(),
                movie.title,
                movie.year,
                movie.synopsis,
                movie.image,
                movie.score,
                i64::from(movie.count),
                movie.created_at.to_rfc3339(),
                movie.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(movie.clone())
    }

    fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM movies WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(StoreError::EntityNotFound(format!("Movie {}", id)));
        }

        Ok(())
    }

    fn search_by_title(&self, title: &str, request: &PageRequest) -> StoreResult<Page<Movie>> {
        let pattern = like_pattern(title);

        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM movies WHERE unicode_lower(title) LIKE ?1 ESCAPE '\\'",
            params![pattern],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM movies
             WHERE unicode_lower(title) LIKE ?1 ESCAPE '\\'
             ORDER BY {}
             LIMIT ?2 OFFSET ?3",
            MOVIE_COLUMNS,
            order_clause(&request.sort)
        ))?;

        let movies = stmt
            .query_map(
                params![pattern, i64::from(request.size), request.offset() as i64],
                Self::row_to_movie,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(movies, request, total.max(0) as u64))
    }
}
