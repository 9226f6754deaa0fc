//! Critical Score Invariants:
//!
//! 1. A score is keyed by (movie, user)
//! 2. Resubmitting updates the existing value, never duplicates
//! 3. Value is finite and within SCORE_MIN..=SCORE_MAX

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 5.0;

/// Composite key of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScoreKey {
    pub movie_id: Uuid,
    pub user_id: Uuid,
}

/// One user's rating of one movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub movie_id: Uuid,
    pub user_id: Uuid,
    pub value: f64,
}

impl Score {
    pub fn new(movie_id: Uuid, user_id: Uuid, value: f64) -> Self {
        Self {
            movie_id,
            user_id,
            value,
        }
    }

    pub fn key(&self) -> ScoreKey {
        ScoreKey {
            movie_id: self.movie_id,
            user_id: self.user_id,
        }
    }
}

pub fn validate_score_value(value: f64) -> DomainResult<()> {
    if !value.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&value) {
        return Err(DomainError::InvariantViolation(format!(
            "Score {} must be between {} and {}",
            value, SCORE_MIN, SCORE_MAX
        )));
    }
    Ok(())
}
