// src/services/score_service.rs
//
// Rating submission and average recomputation.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{validate_score_value, Movie};
use crate::error::{AppError, AppResult};
use crate::repositories::Store;
use crate::services::user_service::UserService;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRequest {
    pub movie_id: Uuid,
    pub value: f64,
}

pub struct ScoreService {
    store: Arc<dyn Store>,
    users: Arc<UserService>,
}

impl ScoreService {
    pub fn new(store: Arc<dyn Store>, users: Arc<UserService>) -> Self {
        Self { store, users }
    }

    /// Record the current user's rating of a movie and return the movie
    /// with its recomputed average.
    ///
    /// The score row and the movie's average are written in one write
    /// transaction. Nothing is written when the movie does not exist.
    pub fn save_score(&self, request: ScoreRequest) -> AppResult<Movie> {
        // Resolved in its own read transaction, which ends before the write begins
        let user = self.users.authenticated()?;
        validate_score_value(request.value)?;

        let tx = self.store.write()?;
        let found = tx.movies().find_by_id(request.movie_id)?;
        let mut movie = match found {
            Some(movie) => movie,
            None => {
                log::debug!("rating rejected, movie {} not found", request.movie_id);
                return Err(AppError::not_found(format!("Movie {}", request.movie_id)));
            }
        };

        let score = movie.upsert_score(user.id, request.value);
        tx.scores().save_and_flush(&score)?;

        movie.recompute_average();
        tx.movies().save(&movie)?;
        tx.commit()?;

        log::info!(
            "{} rated movie {} with {}; average {:?} over {} scores",
            user.username,
            movie.id,
            request.value,
            movie.score,
            movie.count
        );
        Ok(movie)
    }
}
