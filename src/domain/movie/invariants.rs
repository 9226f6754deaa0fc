use super::entity::Movie;
use crate::domain::score::validate_score_value;
use crate::domain::{DomainError, DomainResult};

pub const TITLE_MIN_LEN: usize = 5;
pub const TITLE_MAX_LEN: usize = 80;
pub const YEAR_MIN: i32 = 1888;
pub const YEAR_MAX: i32 = 2100;
pub const IMAGE_MAX_LEN: usize = 255;

/// Validates all Movie invariants
pub fn validate_movie(movie: &Movie) -> DomainResult<()> {
    validate_title(&movie.title)?;
    validate_year(movie.year)?;
    validate_image(movie.image.as_deref())?;
    if let Some(score) = movie.score {
        validate_score_value(score)?;
    }
    Ok(())
}

fn validate_title(title: &str) -> DomainResult<()> {
    let len = title.trim().chars().count();
    if !(TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&len) {
        return Err(DomainError::InvariantViolation(format!(
            "Movie title must have between {} and {} characters",
            TITLE_MIN_LEN, TITLE_MAX_LEN
        )));
    }
    Ok(())
}

fn validate_year(year: i32) -> DomainResult<()> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(DomainError::InvariantViolation(format!(
            "Release year {} is outside {}..={}",
            year, YEAR_MIN, YEAR_MAX
        )));
    }
    Ok(())
}

fn validate_image(image: Option<&str>) -> DomainResult<()> {
    match image {
        Some(img) if img.trim().is_empty() => Err(DomainError::InvariantViolation(
            "Image reference cannot be blank".to_string(),
        )),
        Some(img) if img.chars().count() > IMAGE_MAX_LEN => Err(DomainError::InvariantViolation(
            format!("Image reference exceeds {} characters", IMAGE_MAX_LEN),
        )),
        _ => Ok(()),
    }
}

/// Invariants that must hold true for Movie domain:
///
/// 1. Identity (UUID) is immutable
/// 2. average score == mean(scores) whenever scores were loaded and non-empty
/// 3. average score is absent when there are no scores
/// 4. At most one score per user
/// 5. Title length within bounds, year within bounds
