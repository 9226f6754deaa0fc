// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are caller-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities; input DTOs convert into service requests

use serde::{Deserialize, Serialize};

use crate::domain::{Movie, Page, Score, User, UserDetails};
use crate::services::MovieRequest;

// ============================================================================
// MOVIE DTOs
// ============================================================================

/// Full movie detail, ratings included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub synopsis: Option<String>,
    pub image: Option<String>,
    pub score: Option<f64>,
    pub count: u32,
    pub scores: Vec<ScoreDto>,
    pub created_at: String,
    pub updated_at: String,
}

/// Search result row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummaryDto {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub image: Option<String>,
    pub score: Option<f64>,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieInputDto {
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<Movie> for MovieDto {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id.to_string(),
            title: movie.title,
            year: movie.year,
            synopsis: movie.synopsis,
            image: movie.image,
            score: movie.score,
            count: movie.count,
            scores: movie.scores.into_iter().map(ScoreDto::from).collect(),
            created_at: movie.created_at.to_rfc3339(),
            updated_at: movie.updated_at.to_rfc3339(),
        }
    }
}

impl From<Movie> for MovieSummaryDto {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id.to_string(),
            title: movie.title,
            year: movie.year,
            image: movie.image,
            score: movie.score,
            count: movie.count,
        }
    }
}

impl From<MovieInputDto> for MovieRequest {
    fn from(dto: MovieInputDto) -> Self {
        Self {
            title: dto.title,
            year: dto.year,
            synopsis: dto.synopsis,
            image: dto.image,
        }
    }
}

// ============================================================================
// SCORE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDto {
    pub movie_id: String,
    pub user_id: String,
    pub value: f64,
}

impl From<Score> for ScoreDto {
    fn from(score: Score) -> Self {
        Self {
            movie_id: score.movie_id.to_string(),
            user_id: score.user_id.to_string(),
            value: score.value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreInputDto {
    pub movie_id: String,
    pub value: f64,
}

// ============================================================================
// PAGE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDto<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T, D: From<T>> From<Page<T>> for PageDto<D> {
    fn from(page: Page<T>) -> Self {
        let page = page.map(D::from);
        Self {
            content: page.content,
            number: page.number,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        }
    }
}

// ============================================================================
// USER DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            roles: user.roles.into_iter().map(|r| r.authority).collect(),
        }
    }
}

/// Login principal; the credential is never exposed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailsDto {
    pub username: String,
    pub authorities: Vec<String>,
}

impl From<UserDetails> for UserDetailsDto {
    fn from(details: UserDetails) -> Self {
        Self {
            username: details.username,
            authorities: details.roles.into_iter().map(|r| r.authority).collect(),
        }
    }
}
