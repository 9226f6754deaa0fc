pub mod entity;
pub mod invariants;

pub use entity::{average, Movie};
pub use invariants::validate_movie;
