// src/application/commands/score_commands.rs
//
// Score Command Handlers

use crate::application::{dto::*, error_handling::ToErrorResponse, state::AppState};
use crate::services::ScoreRequest;

use super::parse_id;

/// Rate a movie as the signed-in user; returns the movie with its new average
pub fn save_score(state: &AppState, dto: ScoreInputDto) -> Result<MovieDto, String> {
    let request = ScoreRequest {
        movie_id: parse_id(&dto.movie_id)?,
        value: dto.value,
    };

    let movie = state.score_service.save_score(request).to_error_response()?;

    Ok(MovieDto::from(movie))
}
