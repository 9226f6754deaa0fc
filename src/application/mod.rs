// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Boundary between the command line and the services
// - Translates between DTOs and domain entities
// - Every failure leaves this layer as a JSON ErrorResponse

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;
