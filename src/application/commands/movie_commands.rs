// src/application/commands/movie_commands.rs
//
// Movie Command Handlers

use crate::application::{dto::*, error_handling::ToErrorResponse, state::AppState};
use crate::domain::{PageRequest, Sort};
use crate::error::AppError;

use super::parse_id;

/// Paged title search
pub fn list_movies(
    state: &AppState,
    title: Option<&str>,
    page: u32,
    size: u32,
    sort: Option<&str>,
) -> Result<PageDto<MovieSummaryDto>, String> {
    let request = build_page_request(page, size, sort).to_error_response()?;

    let movies = state
        .movie_service
        .find_all(title.unwrap_or_default(), request)
        .to_error_response()?;

    Ok(movies.into())
}

fn build_page_request(page: u32, size: u32, sort: Option<&str>) -> Result<PageRequest, AppError> {
    let sort = match sort {
        Some(raw) => raw.parse::<Sort>()?,
        None => Sort::default(),
    };
    Ok(PageRequest::new(page, size, sort)?)
}

/// Get a single movie with its ratings
pub fn get_movie(state: &AppState, movie_id: &str) -> Result<MovieDto, String> {
    let id = parse_id(movie_id)?;

    let movie = state.movie_service.find_by_id(id).to_error_response()?;

    Ok(MovieDto::from(movie))
}

pub fn create_movie(state: &AppState, dto: MovieInputDto) -> Result<MovieDto, String> {
    let movie = state.movie_service.insert(dto.into()).to_error_response()?;

    Ok(MovieDto::from(movie))
}

pub fn update_movie(state: &AppState, movie_id: &str, dto: MovieInputDto) -> Result<MovieDto, String> {
    let id = parse_id(movie_id)?;

    let movie = state.movie_service.update(id, dto.into()).to_error_response()?;

    Ok(MovieDto::from(movie))
}

pub fn delete_movie(state: &AppState, movie_id: &str) -> Result<(), String> {
    let id = parse_id(movie_id)?;

    state.movie_service.delete(id).to_error_response()
}
