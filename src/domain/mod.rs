// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod movie;
pub mod page;
pub mod score;
pub mod user;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Movie Domain
pub use movie::{average, validate_movie, Movie};

// Score Domain
pub use score::{validate_score_value, Score, ScoreKey, SCORE_MAX, SCORE_MIN};

// User Domain
pub use user::{Role, User, UserDetails, UserDetailsProjection, ROLE_ADMIN, ROLE_CLIENT};

// Pagination
pub use page::{Page, PageRequest, Sort, SortDirection, SortField};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
