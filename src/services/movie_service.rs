// src/services/movie_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{validate_movie, Movie, Page, PageRequest};
use crate::error::{AppError, AppResult};
use crate::repositories::Store;

/// Editable fields of a movie, as submitted by a caller
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRequest {
    pub title: String,
    pub year: i32,
    pub synopsis: Option<String>,
    pub image: Option<String>,
}

impl MovieRequest {
    /// Trimmed copy; blank optional fields become absent
    fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            year: self.year,
            synopsis: non_blank(self.synopsis),
            image: non_blank(self.image),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct MovieService {
    store: Arc<dyn Store>,
}

impl MovieService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Paged title search. No match is an empty page, not an error.
    pub fn find_all(&self, title: &str, request: PageRequest) -> AppResult<Page<Movie>> {
        let tx = self.store.read()?;
        let page = tx.movies().search_by_title(title.trim(), &request)?;

        log::debug!(
            "title search '{}' page {} by {} {}: {} of {} movies",
            title,
            request.page,
            request.sort.field,
            request.sort.direction,
            page.content.len(),
            page.total_elements
        );
        Ok(page)
    }

    pub fn find_by_id(&self, id: Uuid) -> AppResult<Movie> {
        let tx = self.store.read()?;
        let movie = tx.movies().find_by_id(id)?;

        movie.ok_or_else(|| AppError::not_found(format!("Movie {}", id)))
    }

    pub fn insert(&self, request: MovieRequest) -> AppResult<Movie> {
        let request = request.normalized();
        let movie = Movie::new(request.title, request.year, request.synopsis, request.image);
        validate_movie(&movie)?;

        let tx = self.store.write()?;
        let saved = tx.movies().save(&movie)?;
        tx.commit()?;

        log::info!("created movie {} ({})", saved.id, saved.title);
        Ok(saved)
    }

    /// Overwrites the editable fields of an existing movie.
    /// Ratings and the derived average are left untouched.
    pub fn update(&self, id: Uuid, request: MovieRequest) -> AppResult<Movie> {
        let request = request.normalized();
        let tx = self.store.write()?;

        let exists = tx.movies().exists_by_id(id)?;
        if !exists {
            return Err(AppError::not_found(format!("Movie {}", id)));
        }

        let mut movie = tx.movies().get_reference_by_id(id)?;
        movie.update_details(request.title, request.year, request.synopsis, request.image);
        validate_movie(&movie)?;

        tx.movies().save(&movie)?;
        // Reload so the returned entity carries its ratings again
        let updated = tx.movies().find_by_id(id)?;
        let updated = updated.ok_or_else(|| AppError::not_found(format!("Movie {}", id)))?;
        tx.commit()?;

        log::info!("updated movie {}", id);
        Ok(updated)
    }

    /// Fails with `Conflict` while the movie still has scores
    pub fn delete(&self, id: Uuid) -> AppResult<()> {
        let tx = self.store.write()?;

        let exists = tx.movies().exists_by_id(id)?;
        if !exists {
            return Err(AppError::not_found(format!("Movie {}", id)));
        }

        if let Err(e) = tx.movies().delete_by_id(id) {
            log::warn!("delete of movie {} rejected: {}", id, e);
            return Err(e.into());
        }
        tx.commit()?;

        log::info!("deleted movie {}", id);
        Ok(())
    }
}
