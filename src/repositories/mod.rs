// src/repositories/mod.rs
//
// Repository layer (persistence gateway)
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO cross-repository calls
// - Explicit SQL only
// - Every repository view lives inside one Transaction

pub mod memory;
pub mod movie_repository;
pub mod score_repository;
pub mod store;
pub mod user_repository;

pub use memory::InMemoryStore;
pub use movie_repository::{MovieRepository, SqliteMovieRepository};
pub use score_repository::{ScoreRepository, SqliteScoreRepository};
pub use store::{SqliteStore, Store, Transaction};
pub use user_repository::{SqliteUserRepository, UserRepository};
