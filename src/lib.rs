// src/lib.rs
// MovieScore - movie catalogue with per-user ratings
//
// Architecture:
// - Domain-centric: entities and invariants live in `domain`
// - Persistence gateway: repositories behind a Store/Transaction boundary
// - Services: one transaction per operation, storage errors stop at the boundary
// - Application Layer: DTOs and JSON error responses for the command line

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_movie,
    validate_score_value,
    // Movie
    Movie,
    // Pagination
    Page,
    PageRequest,
    Role,
    // Score
    Score,
    ScoreKey,
    Sort,
    SortDirection,
    SortField,
    // User
    User,
    UserDetails,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult, StoreError, StoreResult};

// ============================================================================
// PUBLIC API - Persistence
// ============================================================================

pub use repositories::{InMemoryStore, SqliteStore, Store, Transaction};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    MovieRequest, MovieService, ScoreRequest, ScoreService, SecurityContext, SessionContext,
    UserService,
};

pub use config::AppConfig;
